// src/models/analysis.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---
// 1. Entrada: a imagem como data URI
// ---
// As duas análises recebem uma única imagem no formato
// `data:<mimetype>;base64,<dados>`, igual ao upload do app original.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub mime_type: String,
    pub base64_data: String,
}

impl ImageData {
    // Decompõe o data URI. Retorna None para qualquer formato fora do
    // esperado (sem prefixo `data:`, sem `;base64,`, payload vazio).
    pub fn from_data_uri(uri: &str) -> Option<Self> {
        let rest = uri.strip_prefix("data:")?;
        let (mime_type, base64_data) = rest.split_once(";base64,")?;
        if mime_type.is_empty() || base64_data.is_empty() {
            return None;
        }
        Some(Self {
            mime_type: mime_type.to_string(),
            base64_data: base64_data.to_string(),
        })
    }
}

// ---
// 2. Saída: análise de fita de teste
// ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChemicalLevels {
    #[schema(example = "1.5 ppm")]
    pub chlorine: String,
    #[schema(example = "7.4")]
    pub ph: String,
    #[schema(example = "100 ppm")]
    pub alkalinity: String,
    pub cyanuric_acid: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestStripAnalysis {
    pub chemical_levels: ChemicalLevels,
    pub suggestions: String,
}

// ---
// 3. Saída: análise de foto da piscina
// ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoolPictureAnalysis {
    #[schema(example = "cloudy")]
    pub water_clarity: String,
    #[schema(example = "debris")]
    pub surface_condition: String,
    pub recommended_actions: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_data_uri() {
        let img = ImageData::from_data_uri("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(img.mime_type, "image/png");
        assert_eq!(img.base64_data, "aGVsbG8=");
    }

    #[test]
    fn rejects_malformed_data_uri() {
        assert!(ImageData::from_data_uri("image/png;base64,aGVsbG8=").is_none());
        assert!(ImageData::from_data_uri("data:image/png,aGVsbG8=").is_none());
        assert!(ImageData::from_data_uri("data:;base64,aGVsbG8=").is_none());
        assert!(ImageData::from_data_uri("data:image/png;base64,").is_none());
    }
}
