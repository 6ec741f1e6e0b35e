use reqwest::multipart::Form;
use serde::Serialize;

use crate::error::{ApiError, Result};
use crate::http::upload::file_part;
use crate::http::ApiClient;
use crate::models::ai::{
    AiModel, AiServiceStatus, AnalysisOptions, ContentAnalysisResult, ContentBody, ContentKind,
    Entities, ImageGenerationOptions, ImageGenerationResult, Keywords, PromptBody,
    SentimentResult, SpeechRecognitionOptions, SpeechRecognitionResult, StyleTransferOptions,
    Summary, SuperResolutionOptions, TextBody, TextTaskOptions, TextToSpeechOptions,
    TextToSpeechResult, UsageStats, UsageStatsQuery,
};
use crate::models::media::UploadFile;

const BASE: &str = "/ai/v1";

/// Input for content analysis: inline text or an uploaded file
#[derive(Debug, Clone)]
pub enum ContentInput {
    Text(String),
    File(UploadFile),
}

#[derive(Debug, Clone)]
pub struct AiApi {
    client: ApiClient,
}

/// Multipart calls carry their options as one JSON text field
fn with_options<O: Serialize>(form: Form, options: Option<&O>) -> Result<Form> {
    match options {
        Some(options) => {
            let raw = serde_json::to_string(options)
                .map_err(|e| ApiError::Request(format!("cannot encode options: {}", e)))?;
            Ok(form.text("options", raw))
        }
        None => Ok(form),
    }
}

impl AiApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn speech_recognition(
        &self,
        audio: &UploadFile,
        options: Option<&SpeechRecognitionOptions>,
    ) -> Result<SpeechRecognitionResult> {
        let form = with_options(Form::new().part("audio", file_part(audio, None)?), options)?;
        self.client
            .upload(&format!("{}/speech/recognition", BASE), form)
            .await
    }

    /// Files go out as `audio_0`, `audio_1`, ...
    pub async fn batch_speech_recognition(
        &self,
        audio_files: &[UploadFile],
        options: Option<&SpeechRecognitionOptions>,
    ) -> Result<Vec<SpeechRecognitionResult>> {
        let mut form = Form::new();
        for (index, file) in audio_files.iter().enumerate() {
            form = form.part(format!("audio_{}", index), file_part(file, None)?);
        }
        let form = with_options(form, options)?;
        self.client
            .upload(&format!("{}/speech/recognition/batch", BASE), form)
            .await
    }

    pub async fn get_speech_recognition_result(
        &self,
        task_id: &str,
    ) -> Result<SpeechRecognitionResult> {
        self.client
            .get(&format!("{}/speech/recognition/{}", BASE, task_id))
            .await
    }

    pub async fn generate_image(
        &self,
        prompt: &str,
        options: &ImageGenerationOptions,
    ) -> Result<Vec<ImageGenerationResult>> {
        self.client
            .post(
                &format!("{}/image/generation", BASE),
                &PromptBody { prompt, options },
            )
            .await
    }

    pub async fn get_image_generation_result(
        &self,
        task_id: &str,
    ) -> Result<ImageGenerationResult> {
        self.client
            .get(&format!("{}/image/generation/{}", BASE, task_id))
            .await
    }

    pub async fn style_transfer(
        &self,
        content_image: &UploadFile,
        style_image: &UploadFile,
        options: Option<&StyleTransferOptions>,
    ) -> Result<ImageGenerationResult> {
        let form = Form::new()
            .part("contentImage", file_part(content_image, None)?)
            .part("styleImage", file_part(style_image, None)?);
        let form = with_options(form, options)?;
        self.client
            .upload(&format!("{}/image/style-transfer", BASE), form)
            .await
    }

    pub async fn super_resolution(
        &self,
        image: &UploadFile,
        options: Option<&SuperResolutionOptions>,
    ) -> Result<ImageGenerationResult> {
        let form = with_options(Form::new().part("image", file_part(image, None)?), options)?;
        self.client
            .upload(&format!("{}/image/super-resolution", BASE), form)
            .await
    }

    pub async fn text_to_speech(
        &self,
        text: &str,
        options: &TextToSpeechOptions,
    ) -> Result<TextToSpeechResult> {
        self.client
            .post(&format!("{}/tts", BASE), &TextBody { text, options })
            .await
    }

    pub async fn get_text_to_speech_result(&self, task_id: &str) -> Result<TextToSpeechResult> {
        self.client
            .get(&format!("{}/tts/{}", BASE, task_id))
            .await
    }

    /// Text is posted as JSON; files go out as multipart with a `type` field
    pub async fn analyze_content(
        &self,
        content: &ContentInput,
        kind: ContentKind,
        options: &AnalysisOptions,
    ) -> Result<ContentAnalysisResult> {
        let path = format!("{}/content/analysis", BASE);
        match content {
            ContentInput::Text(text) => {
                self.client
                    .post(
                        &path,
                        &ContentBody {
                            content: text,
                            kind,
                            options,
                        },
                    )
                    .await
            }
            ContentInput::File(file) => {
                let form = Form::new()
                    .part("file", file_part(file, None)?)
                    .text("type", kind.as_str());
                let form = with_options(form, Some(options))?;
                self.client.upload(&path, form).await
            }
        }
    }

    pub async fn get_content_analysis_result(
        &self,
        task_id: &str,
    ) -> Result<ContentAnalysisResult> {
        self.client
            .get(&format!("{}/content/analysis/{}", BASE, task_id))
            .await
    }

    pub async fn summarize_text(&self, text: &str, options: &TextTaskOptions) -> Result<Summary> {
        self.client
            .post(&format!("{}/text/summarize", BASE), &TextBody { text, options })
            .await
    }

    pub async fn extract_keywords(
        &self,
        text: &str,
        options: &TextTaskOptions,
    ) -> Result<Keywords> {
        self.client
            .post(&format!("{}/text/keywords", BASE), &TextBody { text, options })
            .await
    }

    pub async fn sentiment_analysis(
        &self,
        text: &str,
        options: &TextTaskOptions,
    ) -> Result<SentimentResult> {
        self.client
            .post(&format!("{}/text/sentiment", BASE), &TextBody { text, options })
            .await
    }

    pub async fn entity_recognition(
        &self,
        text: &str,
        options: &TextTaskOptions,
    ) -> Result<Entities> {
        self.client
            .post(&format!("{}/text/entities", BASE), &TextBody { text, options })
            .await
    }

    pub async fn get_models(&self) -> Result<Vec<AiModel>> {
        self.client.get(&format!("{}/models", BASE)).await
    }

    pub async fn get_service_status(&self) -> Result<AiServiceStatus> {
        self.client.get(&format!("{}/status", BASE)).await
    }

    pub async fn get_usage_stats(&self, query: &UsageStatsQuery) -> Result<UsageStats> {
        self.client
            .get_query(&format!("{}/usage/stats", BASE), query)
            .await
    }
}
