//! Company prospecting: turn a sector (and optional location) into a list of
//! realistic Brazilian company records.

use std::sync::Arc;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use troquey_core::domain::lead::Company;

use crate::llm::{LlmClient, LlmError};

#[derive(Debug, Error)]
pub enum ProspectError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("could not parse company payload: {0}")]
    MalformedReply(String),
    #[error("prospect search returned no companies")]
    EmptyResult,
}

/// A prospect backend. The server picks the LLM-backed source or the
/// deterministic mock at bootstrap, based on configuration.
#[async_trait]
pub trait CompanySource: Send + Sync {
    async fn search(
        &self,
        sector: &str,
        location: Option<&str>,
    ) -> Result<Vec<Company>, ProspectError>;
}

const SYSTEM_PROMPT: &str = "Você é um especialista em prospecção B2B no Brasil.\n\
Sua tarefa é gerar dados realistas de empresas brasileiras para fins de demonstração de um \
sistema de prospecção.\n\
Gere empresas fictícias mas realistas do setor solicitado, com CNPJs formatados corretamente \
(XX.XXX.XXX/0001-XX), endereços brasileiros reais, telefones no formato brasileiro e emails \
corporativos.\n\n\
IMPORTANTE: Retorne APENAS um array JSON válido, sem texto adicional, seguindo este formato \
exato:\n\
[\n\
  {\n\
    \"name\": \"Nome da Empresa LTDA\",\n\
    \"cnpj\": \"12.345.678/0001-90\",\n\
    \"address\": \"Rua Example, 123\",\n\
    \"city\": \"São Paulo\",\n\
    \"state\": \"SP\",\n\
    \"phone\": \"(11) 99999-9999\",\n\
    \"email\": \"contato@empresa.com.br\",\n\
    \"website\": \"https://www.empresa.com.br\",\n\
    \"sector\": \"Setor\",\n\
    \"size\": \"Pequena/Média/Grande\"\n\
  }\n\
]";

/// Prospect source backed by the LLM gateway.
pub struct LlmCompanySource {
    llm: Arc<dyn LlmClient>,
    companies_per_search: u32,
    default_location: String,
}

impl LlmCompanySource {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        companies_per_search: u32,
        default_location: impl Into<String>,
    ) -> Self {
        Self { llm, companies_per_search, default_location: default_location.into() }
    }

    fn user_prompt(&self, sector: &str, location: Option<&str>) -> String {
        let location_context = match location {
            Some(location) => format!(" em {location}"),
            None => format!(" {}", self.default_location),
        };

        format!(
            "Gere {count} empresas do setor \"{sector}\"{location_context}.\n\
             Inclua variedade de portes (microempresa, pequena, média, grande).\n\
             Use cidades e bairros reais. Gere CNPJs únicos e formatados corretamente.\n\
             Retorne APENAS o array JSON, sem explicações.",
            count = self.companies_per_search
        )
    }
}

#[async_trait]
impl CompanySource for LlmCompanySource {
    async fn search(
        &self,
        sector: &str,
        location: Option<&str>,
    ) -> Result<Vec<Company>, ProspectError> {
        info!(
            event_name = "agent.prospect.search",
            source = "llm",
            sector,
            "requesting companies from llm gateway"
        );

        let reply = self.llm.complete(SYSTEM_PROMPT, &self.user_prompt(sector, location)).await?;
        let drafts = parse_company_payload(&reply)?;
        if drafts.is_empty() {
            return Err(ProspectError::EmptyResult);
        }

        Ok(drafts.into_iter().map(CompanyDraft::into_company).collect())
    }
}

/// Pull the first JSON array out of a model reply. Models routinely wrap the
/// payload in prose or markdown fences, so everything before the first `[`
/// and after the last `]` is discarded before deserializing.
fn parse_company_payload(reply: &str) -> Result<Vec<CompanyDraft>, ProspectError> {
    let start = reply.find('[');
    let end = reply.rfind(']');

    let payload = match (start, end) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => reply,
    };

    serde_json::from_str::<Vec<CompanyDraft>>(payload)
        .map_err(|error| ProspectError::MalformedReply(error.to_string()))
}

#[derive(Debug, Deserialize)]
struct CompanyDraft {
    name: String,
    cnpj: String,
    address: String,
    city: String,
    state: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    website: Option<String>,
    sector: String,
    #[serde(default)]
    size: Option<String>,
}

impl CompanyDraft {
    fn into_company(self) -> Company {
        Company {
            id: format!("company-{}", Uuid::new_v4()),
            name: self.name,
            cnpj: self.cnpj,
            address: self.address,
            city: self.city,
            state: self.state,
            phone: self.phone,
            email: self.email,
            website: self.website,
            sector: self.sector,
            size: self.size,
        }
    }
}

const MOCK_CITIES: &[(&str, &str)] = &[
    ("São Paulo", "SP"),
    ("Rio de Janeiro", "RJ"),
    ("Belo Horizonte", "MG"),
    ("Curitiba", "PR"),
    ("Porto Alegre", "RS"),
    ("Brasília", "DF"),
];

const MOCK_STREETS: &[&str] = &[
    "Rua das Flores",
    "Av. Brasil",
    "Rua São Paulo",
    "Av. Paulista",
    "Rua XV de Novembro",
    "Av. Atlântica",
    "Rua Augusta",
    "Av. Rio Branco",
];

const MOCK_PREFIXES: &[&str] = &[
    "Alpha", "Beta", "Prime", "Master", "Gold", "Premium", "Elite", "Top", "Super", "Mega",
    "Ultra", "Express", "Plus", "Pro", "Tech",
];

const MOCK_SUFFIXES: &[&str] = &[
    "Soluções",
    "Serviços",
    "Consultoria",
    "Assessoria",
    "Group",
    "Brasil",
    "Tech",
    "Digital",
    "Solutions",
    "Partners",
];

const MOCK_SIZES: &[&str] = &["Microempresa", "Pequena", "Média", "Grande"];

/// Offline prospect source: the demo-mode generator that predates the LLM
/// integration. Seedable so demos and tests are reproducible.
pub struct MockCompanySource {
    companies_per_search: u32,
    rng: Mutex<StdRng>,
}

impl MockCompanySource {
    pub fn new(companies_per_search: u32) -> Self {
        Self { companies_per_search, rng: Mutex::new(StdRng::from_entropy()) }
    }

    pub fn with_seed(companies_per_search: u32, seed: u64) -> Self {
        Self { companies_per_search, rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }

    fn company(rng: &mut StdRng, index: usize, sector: &str) -> Company {
        let (city, state) = MOCK_CITIES[rng.gen_range(0..MOCK_CITIES.len())];
        let prefix = MOCK_PREFIXES[rng.gen_range(0..MOCK_PREFIXES.len())];
        let suffix = MOCK_SUFFIXES[rng.gen_range(0..MOCK_SUFFIXES.len())];
        let street = MOCK_STREETS[rng.gen_range(0..MOCK_STREETS.len())];
        let number: u32 = rng.gen_range(1..=2000);

        let domain_sector: String =
            sector.to_lowercase().chars().filter(|ch| !ch.is_whitespace()).collect();
        let domain = format!("{}{}", prefix.to_lowercase(), domain_sector);

        Company {
            id: format!("company-{}", index + 1),
            name: format!("{prefix} {sector} {suffix}"),
            cnpj: Self::cnpj(rng),
            address: format!("{street}, {number}"),
            city: city.to_string(),
            state: state.to_string(),
            phone: Some(format!(
                "({}) 9{:04}-{:04}",
                rng.gen_range(10..=99),
                rng.gen_range(1000..=9999),
                rng.gen_range(1000..=9999)
            )),
            email: Some(format!("contato@{domain}.com.br")),
            website: Some(format!("https://www.{domain}.com.br")),
            sector: sector.to_string(),
            size: Some(MOCK_SIZES[rng.gen_range(0..MOCK_SIZES.len())].to_string()),
        }
    }

    fn cnpj(rng: &mut StdRng) -> String {
        let mut digit = || rng.gen_range(0..=9);
        format!(
            "{}{}.{}{}{}.{}{}{}/0001-{}{}",
            digit(),
            digit(),
            digit(),
            digit(),
            digit(),
            digit(),
            digit(),
            digit(),
            digit(),
            digit()
        )
    }
}

#[async_trait]
impl CompanySource for MockCompanySource {
    async fn search(
        &self,
        sector: &str,
        _location: Option<&str>,
    ) -> Result<Vec<Company>, ProspectError> {
        info!(
            event_name = "agent.prospect.search",
            source = "mock",
            sector,
            "generating companies locally"
        );

        let mut rng = self.rng.lock().await;
        Ok((0..self.companies_per_search as usize)
            .map(|index| Self::company(&mut rng, index, sector))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::{
        parse_company_payload, CompanySource, LlmCompanySource, MockCompanySource, ProspectError,
    };
    use crate::llm::{LlmClient, LlmError};

    struct CannedLlm {
        reply: Result<&'static str, fn() -> LlmError>,
    }

    #[async_trait]
    impl LlmClient for CannedLlm {
        async fn complete(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
        ) -> Result<String, LlmError> {
            match &self.reply {
                Ok(reply) => Ok((*reply).to_string()),
                Err(make_error) => Err(make_error()),
            }
        }
    }

    const PAYLOAD: &str = r#"[
        {
            "name": "Alpha Tecnologia LTDA",
            "cnpj": "12.345.678/0001-90",
            "address": "Av. Paulista, 1000",
            "city": "São Paulo",
            "state": "SP",
            "phone": "(11) 99999-1234",
            "email": "contato@alphatec.com.br",
            "website": "https://www.alphatec.com.br",
            "sector": "Tecnologia",
            "size": "Média"
        }
    ]"#;

    #[tokio::test]
    async fn llm_source_attaches_ids_to_parsed_companies() {
        let source = LlmCompanySource::new(
            Arc::new(CannedLlm { reply: Ok(PAYLOAD) }),
            12,
            "no Brasil",
        );

        let companies = source.search("Tecnologia", None).await.expect("search companies");

        assert_eq!(companies.len(), 1);
        assert!(companies[0].id.starts_with("company-"));
        assert_eq!(companies[0].name, "Alpha Tecnologia LTDA");
        assert_eq!(companies[0].size.as_deref(), Some("Média"));
    }

    #[tokio::test]
    async fn rate_limit_errors_pass_through_untouched() {
        let source = LlmCompanySource::new(
            Arc::new(CannedLlm { reply: Err(|| LlmError::RateLimited) }),
            12,
            "no Brasil",
        );

        let error = source.search("Tecnologia", None).await.expect_err("rate limited");
        assert!(matches!(error, ProspectError::Llm(LlmError::RateLimited)));
    }

    #[test]
    fn payload_parsing_tolerates_prose_and_fences() {
        let wrapped = format!("Claro! Aqui estão as empresas:\n```json\n{PAYLOAD}\n```\n");
        let drafts = parse_company_payload(&wrapped).expect("parse wrapped payload");
        assert_eq!(drafts.len(), 1);

        let bare = parse_company_payload(PAYLOAD).expect("parse bare payload");
        assert_eq!(bare.len(), 1);
    }

    #[test]
    fn payload_parsing_rejects_non_json_replies() {
        let error =
            parse_company_payload("não consegui gerar as empresas").expect_err("must fail");
        assert!(matches!(error, ProspectError::MalformedReply(_)));
    }

    #[test]
    fn user_prompt_defaults_location_and_respects_override() {
        let source = LlmCompanySource::new(
            Arc::new(CannedLlm { reply: Ok(PAYLOAD) }),
            25,
            "no Brasil",
        );

        let default_prompt = source.user_prompt("Consultoria", None);
        assert!(default_prompt.contains("Gere 25 empresas do setor \"Consultoria\" no Brasil."));

        let located_prompt = source.user_prompt("Consultoria", Some("Campinas"));
        assert!(located_prompt.contains("\"Consultoria\" em Campinas."));
    }

    #[tokio::test]
    async fn mock_source_generates_the_configured_count() {
        let source = MockCompanySource::with_seed(12, 7);
        let companies = source.search("Consultoria", None).await.expect("generate companies");

        assert_eq!(companies.len(), 12);
        for company in &companies {
            assert!(company.name.contains("Consultoria"));
            assert_eq!(company.cnpj.len(), "12.345.678/0001-90".len());
            assert!(company.email.as_deref().expect("email").starts_with("contato@"));
        }
    }

    #[tokio::test]
    async fn seeded_mock_source_is_reproducible() {
        let first = MockCompanySource::with_seed(5, 42)
            .search("Serviços", None)
            .await
            .expect("first run");
        let second = MockCompanySource::with_seed(5, 42)
            .search("Serviços", None)
            .await
            .expect("second run");

        assert_eq!(first, second);
    }
}
