use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

/// A prospected company as returned by a search. Transient: only becomes
/// durable once the user saves it as a lead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub cnpj: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub sector: String,
    pub size: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Proposal,
    Closed,
    Lost,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Qualified => "qualified",
            Self::Proposal => "proposal",
            Self::Closed => "closed",
            Self::Lost => "lost",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(Self::New),
            "contacted" => Some(Self::Contacted),
            "qualified" => Some(Self::Qualified),
            "proposal" => Some(Self::Proposal),
            "closed" => Some(Self::Closed),
            "lost" => Some(Self::Lost),
            _ => None,
        }
    }
}

/// A company the user chose to keep, tracked through the sales pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedLead {
    pub id: LeadId,
    pub owner_id: String,
    pub company_name: String,
    pub cnpj: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub sector: String,
    pub status: LeadStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavedLead {
    pub fn from_company(id: LeadId, owner_id: impl Into<String>, company: &Company) -> Self {
        let now = Utc::now();
        Self {
            id,
            owner_id: owner_id.into(),
            company_name: company.name.clone(),
            cnpj: Some(company.cnpj.clone()),
            address: Some(company.address.clone()),
            city: Some(company.city.clone()),
            state: Some(company.state.clone()),
            phone: company.phone.clone(),
            email: company.email.clone(),
            website: company.website.clone(),
            sector: company.sector.clone(),
            status: LeadStatus::New,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Company, LeadId, LeadStatus, SavedLead};

    #[test]
    fn lead_status_round_trips_through_strings() {
        for status in [
            LeadStatus::New,
            LeadStatus::Contacted,
            LeadStatus::Qualified,
            LeadStatus::Proposal,
            LeadStatus::Closed,
            LeadStatus::Lost,
        ] {
            assert_eq!(LeadStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(LeadStatus::parse("archived"), None);
    }

    #[test]
    fn saved_lead_starts_as_new_with_company_contact_data() {
        let company = Company {
            id: "company-1".to_string(),
            name: "Alpha Tecnologia Soluções".to_string(),
            cnpj: "12.345.678/0001-90".to_string(),
            address: "Av. Paulista, 1000".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            phone: Some("(11) 99999-1234".to_string()),
            email: Some("contato@alphatec.com.br".to_string()),
            website: None,
            sector: "Tecnologia".to_string(),
            size: Some("Média".to_string()),
        };

        let lead = SavedLead::from_company(LeadId("lead-1".to_string()), "user-1", &company);

        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.company_name, "Alpha Tecnologia Soluções");
        assert_eq!(lead.cnpj.as_deref(), Some("12.345.678/0001-90"));
        assert_eq!(lead.notes, None);
        assert_eq!(lead.created_at, lead.updated_at);
    }
}
