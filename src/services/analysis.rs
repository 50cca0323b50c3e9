// src/services/analysis.rs

// As duas análises de imagem do app: leitura de fita de teste e avaliação
// da foto da piscina. Chamada única ao serviço de inferência (Gemini),
// com timeout; sem retry. Qualquer falha vira InferenceError e nada é
// persistido.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
    common::error::AppError,
    models::analysis::{ImageData, PoolPictureAnalysis, TestStripAnalysis},
};

const TEST_STRIP_PROMPT: &str = "You are an expert pool maintenance advisor. \
Analyze the provided image of a pool test strip and provide chemical level readings \
and specific suggestions for adjusting the pool's chemical balance.";

const POOL_PICTURE_PROMPT: &str = "You are an expert pool maintenance technician. \
You will analyze the provided picture of a pool and provide advice on what actions \
to take to improve water clarity and surface condition.";

// ---
// 1. O seam: quem fala com o modelo
// ---
// Trait para podermos trocar o cliente real por um fake nos testes.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze_test_strip(&self, image: &ImageData) -> Result<TestStripAnalysis, AppError>;

    async fn analyze_pool_picture(
        &self,
        image: &ImageData,
    ) -> Result<PoolPictureAnalysis, AppError>;
}

// ---
// 2. O cliente real (Gemini via REST)
// ---

#[derive(Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, timeout: Duration) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_key,
            model,
        })
    }

    // Uma chamada generateContent com saída estruturada (JSON conforme o
    // schema). O texto do único candidato é o JSON da análise.
    async fn generate(
        &self,
        prompt: &str,
        image: &ImageData,
        response_schema: Value,
    ) -> Result<Value, AppError> {
        if self.api_key.is_empty() {
            return Err(AppError::InferenceError(
                "GEMINI_API_KEY não configurada".to_string(),
            ));
        }

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let body = json!({
            "contents": [{
                "parts": [
                    { "inlineData": { "mimeType": image.mime_type, "data": image.base64_data } },
                    { "text": prompt }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema
            }
        });

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::InferenceError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::InferenceError(format!(
                "status {}: {}",
                status, text
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AppError::InferenceError(e.to_string()))?;

        let text = payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                AppError::InferenceError("resposta sem candidato de texto".to_string())
            })?;

        serde_json::from_str(text).map_err(|e| {
            AppError::InferenceError(format!("resposta fora do schema: {}", e))
        })
    }
}

#[async_trait]
impl AnalysisClient for GeminiClient {
    async fn analyze_test_strip(&self, image: &ImageData) -> Result<TestStripAnalysis, AppError> {
        let schema = json!({
            "type": "OBJECT",
            "properties": {
                "chemicalLevels": {
                    "type": "OBJECT",
                    "properties": {
                        "chlorine": { "type": "STRING" },
                        "ph": { "type": "STRING" },
                        "alkalinity": { "type": "STRING" },
                        "cyanuricAcid": { "type": "STRING" }
                    },
                    "required": ["chlorine", "ph", "alkalinity", "cyanuricAcid"]
                },
                "suggestions": { "type": "STRING" }
            },
            "required": ["chemicalLevels", "suggestions"]
        });

        let value = self.generate(TEST_STRIP_PROMPT, image, schema).await?;
        serde_json::from_value(value)
            .map_err(|e| AppError::InferenceError(format!("resposta fora do schema: {}", e)))
    }

    async fn analyze_pool_picture(
        &self,
        image: &ImageData,
    ) -> Result<PoolPictureAnalysis, AppError> {
        let schema = json!({
            "type": "OBJECT",
            "properties": {
                "waterClarity": { "type": "STRING" },
                "surfaceCondition": { "type": "STRING" },
                "recommendedActions": { "type": "STRING" }
            },
            "required": ["waterClarity", "surfaceCondition", "recommendedActions"]
        });

        let value = self.generate(POOL_PICTURE_PROMPT, image, schema).await?;
        serde_json::from_value(value)
            .map_err(|e| AppError::InferenceError(format!("resposta fora do schema: {}", e)))
    }
}

// ---
// 3. O serviço exposto aos handlers
// ---

#[derive(Clone)]
pub struct AnalysisService {
    client: Arc<dyn AnalysisClient>,
}

impl AnalysisService {
    pub fn new(client: Arc<dyn AnalysisClient>) -> Self {
        Self { client }
    }

    pub async fn analyze_test_strip(&self, data_uri: &str) -> Result<TestStripAnalysis, AppError> {
        let image = ImageData::from_data_uri(data_uri).ok_or_else(|| {
            AppError::InvalidInput(
                "Imagem inválida: esperado data URI base64 (data:<mime>;base64,...).".to_string(),
            )
        })?;
        self.client.analyze_test_strip(&image).await
    }

    pub async fn analyze_pool_picture(
        &self,
        data_uri: &str,
    ) -> Result<PoolPictureAnalysis, AppError> {
        let image = ImageData::from_data_uri(data_uri).ok_or_else(|| {
            AppError::InvalidInput(
                "Imagem inválida: esperado data URI base64 (data:<mime>;base64,...).".to_string(),
            )
        })?;
        self.client.analyze_pool_picture(&image).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::ChemicalLevels;

    struct FakeClient;

    #[async_trait]
    impl AnalysisClient for FakeClient {
        async fn analyze_test_strip(
            &self,
            _image: &ImageData,
        ) -> Result<TestStripAnalysis, AppError> {
            Ok(TestStripAnalysis {
                chemical_levels: ChemicalLevels {
                    chlorine: "1.5 ppm".into(),
                    ph: "7.4".into(),
                    alkalinity: "100 ppm".into(),
                    cyanuric_acid: "40 ppm".into(),
                },
                suggestions: "Nada a ajustar.".into(),
            })
        }

        async fn analyze_pool_picture(
            &self,
            _image: &ImageData,
        ) -> Result<PoolPictureAnalysis, AppError> {
            Err(AppError::InferenceError("modelo indisponível".into()))
        }
    }

    #[tokio::test]
    async fn rejects_non_data_uri_before_calling_the_model() {
        let service = AnalysisService::new(Arc::new(FakeClient));
        let result = service.analyze_test_strip("https://example.com/foto.png").await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn surfaces_client_result() {
        let service = AnalysisService::new(Arc::new(FakeClient));

        let ok = service
            .analyze_test_strip("data:image/png;base64,aGVsbG8=")
            .await
            .unwrap();
        assert_eq!(ok.chemical_levels.ph, "7.4");

        let err = service
            .analyze_pool_picture("data:image/png;base64,aGVsbG8=")
            .await;
        assert!(matches!(err, Err(AppError::InferenceError(_))));
    }
}
