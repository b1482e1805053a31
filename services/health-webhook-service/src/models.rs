use serde::{Deserialize, Serialize};

// Field order here is the order receipts are rendered in.

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PetInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub species: String,
    pub birth: String,
    pub breed: String,
    pub gender: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Analysis {
    pub result: String,
    pub abnormal_probability: i64,
    pub mmvd_stage: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Vitals {
    pub bpm: i64,
    pub weight: f64,
    pub bcs: i64,
    pub respiration_rate: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Survey {
    #[serde(default)]
    pub vitality: Option<i64>,
    #[serde(default)]
    pub appetite: Option<i64>,
    #[serde(default)]
    pub cough: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthDataPayload {
    pub pet_info: PetInfo,
    pub analysis: Analysis,
    pub vitals: Vitals,
    #[serde(default)]
    pub survey: Option<Survey>,
}

#[derive(Debug, Serialize)]
pub struct Acknowledgment {
    pub status: &'static str,
    pub message: &'static str,
    pub received_pet: String,
}

impl Acknowledgment {
    pub fn received(pet_name: String) -> Self {
        Self {
            status: "success",
            message: "Data received successfully",
            received_pet: pet_name,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse<T> {
    pub detail: T,
}
