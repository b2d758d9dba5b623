use super::entity::{
    combo_field, date, date_field, next_numeric_id, next_prefixed_id, string_combo, text_field,
    EntityRecord,
};
use crate::store::keys;
use crate::table::{Column, Record, RecordId};
use crate::theme::Theme;
use chrono::{Local, NaiveDate};
use eframe::egui;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TenantStatus {
    Active,
    Suspended,
    Inactive,
}

impl TenantStatus {
    pub const ALL: [Self; 3] = [Self::Active, Self::Suspended, Self::Inactive];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Suspended => "Suspended",
            Self::Inactive => "Inactive",
        }
    }
}

/// One customer workspace on the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub plan: String,
    pub status: TenantStatus,
    pub created: NaiveDate,
}

impl Default for Tenant {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            email: String::new(),
            plan: "Starter".to_string(),
            status: TenantStatus::Active,
            created: Local::now().date_naive(),
        }
    }
}

impl Record for Tenant {
    fn id(&self) -> RecordId {
        RecordId::Num(self.id)
    }

    fn field(&self, key: &str) -> String {
        match key {
            "id" => self.id.to_string(),
            "name" => self.name.clone(),
            "email" => self.email.clone(),
            "plan" => self.plan.clone(),
            "status" => self.status.as_str().to_string(),
            "created" => self.created.to_string(),
            _ => String::new(),
        }
    }
}

impl EntityRecord for Tenant {
    const TITLE: &'static str = "Tenants";
    const NOUN: &'static str = "Tenant";
    const STORE_KEY: &'static str = keys::TENANTS;
    const COLUMNS: &'static [Column] = &[
        Column::new("name", "Name"),
        Column::new("email", "Email"),
        Column::new("plan", "Plan"),
        Column::new("status", "Status"),
        Column::new("created", "Created"),
    ];
    const SEARCH_HINT: &'static str = "Search tenants...";
    const EXPORT_STEM: &'static str = "tenants";

    fn seed() -> Vec<Self> {
        vec![
            Self {
                id: 1,
                name: "Acme Corp".to_string(),
                email: "contact@acme.com".to_string(),
                plan: "Enterprise".to_string(),
                status: TenantStatus::Active,
                created: date(2024, 1, 15),
            },
            Self {
                id: 2,
                name: "Tech Solutions".to_string(),
                email: "info@techsolutions.com".to_string(),
                plan: "Professional".to_string(),
                status: TenantStatus::Active,
                created: date(2024, 2, 20),
            },
            Self {
                id: 3,
                name: "Global Inc".to_string(),
                email: "admin@globalinc.com".to_string(),
                plan: "Starter".to_string(),
                status: TenantStatus::Suspended,
                created: date(2024, 3, 10),
            },
            Self {
                id: 4,
                name: "Digital Agency".to_string(),
                email: "hello@digitalagency.com".to_string(),
                plan: "Professional".to_string(),
                status: TenantStatus::Active,
                created: date(2024, 4, 5),
            },
            Self {
                id: 5,
                name: "StartupXYZ".to_string(),
                email: "founders@startupxyz.com".to_string(),
                plan: "Starter".to_string(),
                status: TenantStatus::Inactive,
                created: date(2024, 5, 12),
            },
        ]
    }

    fn assign_next_id(&mut self, existing: &[Self]) {
        self.id = next_numeric_id(existing);
    }

    fn edit_form(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        text_field(ui, theme, "Name", &mut self.name);
        text_field(ui, theme, "Email", &mut self.email);
        string_combo(
            ui,
            theme,
            "Plan",
            &mut self.plan,
            &["Starter", "Professional", "Enterprise"],
        );
        combo_field(
            ui,
            theme,
            "Status",
            &mut self.status,
            &TenantStatus::ALL,
            TenantStatus::as_str,
        );
        date_field(ui, theme, "Created", &mut self.created);
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        if self.email.trim().is_empty() {
            return Err("Email is required".to_string());
        }
        if !self.email.contains('@') {
            return Err("Email must contain @".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactStatus {
    Subscribed,
    Unsubscribed,
}

impl ContactStatus {
    pub const ALL: [Self; 2] = [Self::Subscribed, Self::Unsubscribed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Subscribed => "Subscribed",
            Self::Unsubscribed => "Unsubscribed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: u64,
    pub name: String,
    pub phone: String,
    pub group: String,
    pub status: ContactStatus,
    pub created: NaiveDate,
}

impl Default for Contact {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            phone: String::new(),
            group: "Leads".to_string(),
            status: ContactStatus::Subscribed,
            created: Local::now().date_naive(),
        }
    }
}

impl Record for Contact {
    fn id(&self) -> RecordId {
        RecordId::Num(self.id)
    }

    fn field(&self, key: &str) -> String {
        match key {
            "id" => self.id.to_string(),
            "name" => self.name.clone(),
            "phone" => self.phone.clone(),
            "group" => self.group.clone(),
            "status" => self.status.as_str().to_string(),
            "created" => self.created.to_string(),
            _ => String::new(),
        }
    }
}

impl EntityRecord for Contact {
    const TITLE: &'static str = "Contacts";
    const NOUN: &'static str = "Contact";
    const STORE_KEY: &'static str = keys::CONTACTS;
    const COLUMNS: &'static [Column] = &[
        Column::new("name", "Name"),
        Column::new("phone", "Phone"),
        Column::new("group", "Group"),
        Column::new("status", "Status"),
        Column::new("created", "Created"),
    ];
    const SEARCH_HINT: &'static str = "Search contacts...";
    const EXPORT_STEM: &'static str = "contacts";

    fn seed() -> Vec<Self> {
        vec![
            Self {
                id: 1,
                name: "John Doe".to_string(),
                phone: "+1234567890".to_string(),
                group: "Customers".to_string(),
                status: ContactStatus::Subscribed,
                created: date(2024, 3, 1),
            },
            Self {
                id: 2,
                name: "Jane Smith".to_string(),
                phone: "+1987654321".to_string(),
                group: "Leads".to_string(),
                status: ContactStatus::Subscribed,
                created: date(2024, 3, 8),
            },
            Self {
                id: 3,
                name: "Bob Wilson".to_string(),
                phone: "+1122334455".to_string(),
                group: "VIP".to_string(),
                status: ContactStatus::Unsubscribed,
                created: date(2024, 4, 2),
            },
            Self {
                id: 4,
                name: "Alice Brown".to_string(),
                phone: "+1555666777".to_string(),
                group: "Customers".to_string(),
                status: ContactStatus::Subscribed,
                created: date(2024, 4, 18),
            },
            Self {
                id: 5,
                name: "Charlie Davis".to_string(),
                phone: "+1999888777".to_string(),
                group: "Leads".to_string(),
                status: ContactStatus::Unsubscribed,
                created: date(2024, 5, 3),
            },
        ]
    }

    fn assign_next_id(&mut self, existing: &[Self]) {
        self.id = next_numeric_id(existing);
    }

    fn edit_form(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        text_field(ui, theme, "Name", &mut self.name);
        text_field(ui, theme, "Phone", &mut self.phone);
        string_combo(
            ui,
            theme,
            "Group",
            &mut self.group,
            &["Leads", "Customers", "VIP"],
        );
        combo_field(
            ui,
            theme,
            "Status",
            &mut self.status,
            &ContactStatus::ALL,
            ContactStatus::as_str,
        );
        date_field(ui, theme, "Created", &mut self.created);
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        if self.phone.trim().is_empty() {
            return Err("Phone is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketPriority {
    High,
    Medium,
    Low,
}

impl TicketPriority {
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
}

impl TicketStatus {
    pub const ALL: [Self; 3] = [Self::Open, Self::InProgress, Self::Resolved];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub subject: String,
    pub tenant: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub created: NaiveDate,
}

impl Default for Ticket {
    fn default() -> Self {
        Self {
            id: String::new(),
            subject: String::new(),
            tenant: String::new(),
            priority: TicketPriority::Medium,
            status: TicketStatus::Open,
            created: Local::now().date_naive(),
        }
    }
}

impl Record for Ticket {
    fn id(&self) -> RecordId {
        RecordId::Text(self.id.clone())
    }

    fn field(&self, key: &str) -> String {
        match key {
            "id" => self.id.clone(),
            "subject" => self.subject.clone(),
            "tenant" => self.tenant.clone(),
            "priority" => self.priority.as_str().to_string(),
            "status" => self.status.as_str().to_string(),
            "created" => self.created.to_string(),
            _ => String::new(),
        }
    }
}

impl EntityRecord for Ticket {
    const TITLE: &'static str = "Support Tickets";
    const NOUN: &'static str = "Ticket";
    const STORE_KEY: &'static str = keys::TICKETS;
    const COLUMNS: &'static [Column] = &[
        Column::new("id", "Ticket"),
        Column::new("subject", "Subject"),
        Column::new("tenant", "Tenant"),
        Column::new("priority", "Priority"),
        Column::new("status", "Status"),
        Column::new("created", "Created"),
    ];
    const SEARCH_HINT: &'static str = "Search tickets...";
    const EXPORT_STEM: &'static str = "tickets";

    fn seed() -> Vec<Self> {
        vec![
            Self {
                id: "TKT-001".to_string(),
                subject: "Cannot send campaign messages".to_string(),
                tenant: "Acme Corp".to_string(),
                priority: TicketPriority::High,
                status: TicketStatus::Open,
                created: date(2024, 6, 1),
            },
            Self {
                id: "TKT-002".to_string(),
                subject: "Billing question about plan upgrade".to_string(),
                tenant: "Tech Solutions".to_string(),
                priority: TicketPriority::Medium,
                status: TicketStatus::InProgress,
                created: date(2024, 6, 3),
            },
            Self {
                id: "TKT-003".to_string(),
                subject: "Template rejected twice".to_string(),
                tenant: "Global Inc".to_string(),
                priority: TicketPriority::Low,
                status: TicketStatus::Resolved,
                created: date(2024, 6, 5),
            },
            Self {
                id: "TKT-004".to_string(),
                subject: "Webhook retries failing".to_string(),
                tenant: "Digital Agency".to_string(),
                priority: TicketPriority::High,
                status: TicketStatus::Open,
                created: date(2024, 6, 8),
            },
        ]
    }

    fn assign_next_id(&mut self, existing: &[Self]) {
        self.id = next_prefixed_id(existing, "TKT");
    }

    fn edit_form(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        text_field(ui, theme, "Subject", &mut self.subject);
        text_field(ui, theme, "Tenant", &mut self.tenant);
        combo_field(
            ui,
            theme,
            "Priority",
            &mut self.priority,
            &TicketPriority::ALL,
            TicketPriority::as_str,
        );
        combo_field(
            ui,
            theme,
            "Status",
            &mut self.status,
            &TicketStatus::ALL,
            TicketStatus::as_str,
        );
        date_field(ui, theme, "Created", &mut self.created);
    }

    fn validate(&self) -> Result<(), String> {
        if self.subject.trim().is_empty() {
            return Err("Subject is required".to_string());
        }
        if self.tenant.trim().is_empty() {
            return Err("Tenant is required".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenant_validation_requires_name_and_real_email() {
        let mut tenant = Tenant::default();
        assert!(tenant.validate().is_err());

        tenant.name = "Acme".to_string();
        tenant.email = "not-an-email".to_string();
        assert_eq!(tenant.validate(), Err("Email must contain @".to_string()));

        tenant.email = "ops@acme.com".to_string();
        assert!(tenant.validate().is_ok());
    }

    #[test]
    fn seeded_collections_survive_a_serde_round_trip() {
        let seeds = Tenant::seed();
        let json = serde_json::to_string(&seeds).expect("seed should serialize");
        let back: Vec<Tenant> = serde_json::from_str(&json).expect("seed should deserialize");
        assert_eq!(back, seeds);
    }

    #[test]
    fn ticket_ids_are_prefixed_text() {
        let mut ticket = Ticket::default();
        ticket.assign_next_id(&Ticket::seed());
        assert_eq!(ticket.id, "TKT-005");
        assert_eq!(ticket.id(), RecordId::Text("TKT-005".to_string()));
    }

    #[test]
    fn status_labels_read_like_the_ui() {
        assert_eq!(TicketStatus::InProgress.as_str(), "In Progress");
        assert_eq!(TenantStatus::Suspended.as_str(), "Suspended");
        assert_eq!(ContactStatus::Unsubscribed.as_str(), "Unsubscribed");
    }
}
