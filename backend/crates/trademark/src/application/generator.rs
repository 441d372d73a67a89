//! Name Generation
//!
//! Prompt construction and the text-provider seam.

use crate::application::config::ProviderSettings;
use rand::Rng;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "You are a trademark specialist who creates unique, coined brand names. \
You specialize in inventing names that don't exist in USPTO database. \
Always return a JSON array with exactly 10 names between 4-9 letters.";

/// Thematic framing of a generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTheme {
    Retail,
    Technology,
    Wellness,
    FoodAndBeverage,
    Finance,
}

impl PromptTheme {
    pub const ALL: [PromptTheme; 5] = [
        PromptTheme::Retail,
        PromptTheme::Technology,
        PromptTheme::Wellness,
        PromptTheme::FoodAndBeverage,
        PromptTheme::Finance,
    ];

    /// Pick a theme uniformly at random
    pub fn random() -> Self {
        let index = rand::rng().random_range(0..Self::ALL.len());
        Self::ALL[index]
    }

    /// Industry label the provider is asked to use
    pub fn industry(&self) -> &'static str {
        match self {
            PromptTheme::Retail => "Retail",
            PromptTheme::Technology => "Technology",
            PromptTheme::Wellness => "Wellness",
            PromptTheme::FoodAndBeverage => "Food & Beverage",
            PromptTheme::Finance => "Finance",
        }
    }

    fn services(&self) -> &'static str {
        match self {
            PromptTheme::Retail => "general retail store services suitable for Amazon stores",
            PromptTheme::Technology => "consumer technology and software products",
            PromptTheme::Wellness => "health, fitness and personal wellness products",
            PromptTheme::FoodAndBeverage => "packaged food and beverage products",
            PromptTheme::Finance => "personal finance and payment services",
        }
    }

    fn closing(&self) -> &'static str {
        match self {
            PromptTheme::Retail => "modern retail businesses",
            PromptTheme::Technology => "modern technology brands",
            PromptTheme::Wellness => "modern wellness brands",
            PromptTheme::FoodAndBeverage => "modern food and beverage brands",
            PromptTheme::Finance => "modern financial brands",
        }
    }
}

/// Fully built request for a text provider
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSpec {
    pub theme: PromptTheme,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl PromptSpec {
    /// Deterministic prompt for `theme`
    pub fn for_theme(theme: PromptTheme, settings: &ProviderSettings) -> Self {
        let industry = theme.industry();
        let user = format!(
            r#"Act as a trademark naming specialist. Generate 10 unique brand names for {services}.

CRITICAL CONSTRAINTS:
1. Length must be between 4-9 LETTERS
2. Must be COINED/INVENTED names that don't exist in USPTO database
3. Must be easily pronounceable for English speakers
4. Names should feel modern, memorable, and brandable

METHODOLOGY:
- Create completely invented words that sound professional
- Blend sounds and syllables creatively
- Focus on euphonic combinations that roll off the tongue
- Avoid existing words or obvious derivatives

Return ONLY a valid JSON array (no markdown, no explanation) with exactly 10 objects. Start with [ and end with ]. Example format:
[
  {{"name": "NEXORA", "description": "A fusion of 'next' and 'aurora', suggesting innovation", "industry": "{industry}"}},
  {{"name": "VELURA", "description": "Combines velvet and allure for premium feel", "industry": "{industry}"}}
]

Generate 10 coined, unique names perfect for {closing}."#,
            services = theme.services(),
            closing = theme.closing(),
        );

        Self {
            theme,
            system: SYSTEM_PROMPT.to_string(),
            user,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }
}

/// Error from a text-generation provider
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider credential is not configured")]
    MissingCredential,

    #[error("Provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Provider returned no content")]
    EmptyResponse,
}

/// Trait for text-generation backends
#[trait_variant::make(TextProvider: Send)]
pub trait LocalTextProvider {
    /// Single-shot completion; returns the raw text of the first choice
    async fn complete(&self, prompt: &PromptSpec) -> Result<String, ProviderError>;
}

/// Produces raw provider text for a prompt
pub struct NameGenerator<P>
where
    P: TextProvider,
{
    provider: Arc<P>,
    settings: ProviderSettings,
}

impl<P> NameGenerator<P>
where
    P: TextProvider + Sync,
{
    pub fn new(provider: Arc<P>, settings: ProviderSettings) -> Self {
        Self { provider, settings }
    }

    pub fn prompt(&self, theme: PromptTheme) -> PromptSpec {
        PromptSpec::for_theme(theme, &self.settings)
    }

    /// Call the provider; blank output is [`ProviderError::EmptyResponse`]
    ///
    /// Fails with [`ProviderError::MissingCredential`] before any call when no
    /// API key is configured.
    pub async fn generate(&self, prompt: &PromptSpec) -> Result<String, ProviderError> {
        if !self.settings.has_credential() {
            return Err(ProviderError::MissingCredential);
        }

        let raw = self.provider.complete(prompt).await?;
        if raw.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        tracing::debug!(theme = ?prompt.theme, raw = %raw, "Provider raw response");
        Ok(raw)
    }
}
