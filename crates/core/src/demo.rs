//! Demonstration records shown when demo mode is on and the CRM has no data.

use crate::models::client::Client;
use crate::models::deal::{Deal, DealStage};

pub fn demo_clients() -> Vec<Client> {
    vec![
        demo_client("demo-atlas", "Atlas Digital", "active", "Tech", "contact@atlas-digital.ma", 85),
        demo_client("demo-sahara", "Sahara Logistics", "prospect", "Transport", "info@sahara-log.ma", 70),
        demo_client("demo-medina", "Medina Conseil", "active", "Conseil", "bonjour@medina-conseil.ma", 78),
    ]
}

pub fn demo_deals() -> Vec<Deal> {
    vec![
        Deal {
            id: "demo-deal-1".to_string(),
            title: "Site e-commerce".to_string(),
            client: "demo-atlas".to_string(),
            value: 45_000.0,
            stage: DealStage::Negotiation,
        },
        Deal {
            id: "demo-deal-2".to_string(),
            title: "Automatisation suivi colis".to_string(),
            client: "demo-sahara".to_string(),
            value: 28_000.0,
            stage: DealStage::Proposal,
        },
    ]
}

fn demo_client(id: &str, name: &str, client_type: &str, sector: &str, contact: &str, score: i64) -> Client {
    Client {
        id: id.to_string(),
        name: name.to_string(),
        client_type: client_type.to_string(),
        sector: sector.to_string(),
        contact: Some(contact.to_string()),
        score,
        last_contact: None,
    }
}

/// Whether `id` belongs to one of the demonstration clients or deals.
pub fn is_demo_id(id: &str) -> bool {
    demo_clients().iter().any(|c| c.id == id) || demo_deals().iter().any(|d| d.id == id)
}
