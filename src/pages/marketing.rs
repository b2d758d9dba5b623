use super::entity::{
    combo_field, count_field, date, date_field, multiline_field, next_numeric_id, string_combo,
    text_field, EntityRecord,
};
use crate::store::keys;
use crate::table::{Column, Record, RecordId};
use crate::theme::Theme;
use chrono::{Local, NaiveDate};
use eframe::egui;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateCategory {
    Utility,
    Marketing,
    Authentication,
}

impl TemplateCategory {
    pub const ALL: [Self; 3] = [Self::Utility, Self::Marketing, Self::Authentication];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Utility => "Utility",
            Self::Marketing => "Marketing",
            Self::Authentication => "Authentication",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateStatus {
    Approved,
    Pending,
    Rejected,
}

impl TemplateStatus {
    pub const ALL: [Self; 3] = [Self::Approved, Self::Pending, Self::Rejected];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::Pending => "Pending",
            Self::Rejected => "Rejected",
        }
    }
}

/// A reusable message body that goes through an approval flow before
/// campaigns may send it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub id: u64,
    pub name: String,
    pub category: TemplateCategory,
    pub language: String,
    pub body: String,
    pub status: TemplateStatus,
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            category: TemplateCategory::Utility,
            language: "en".to_string(),
            body: String::new(),
            status: TemplateStatus::Pending,
        }
    }
}

impl Record for MessageTemplate {
    fn id(&self) -> RecordId {
        RecordId::Num(self.id)
    }

    fn field(&self, key: &str) -> String {
        match key {
            "id" => self.id.to_string(),
            "name" => self.name.clone(),
            "category" => self.category.as_str().to_string(),
            "language" => self.language.clone(),
            "body" => self.body.clone(),
            "status" => self.status.as_str().to_string(),
            _ => String::new(),
        }
    }
}

impl EntityRecord for MessageTemplate {
    const TITLE: &'static str = "Message Templates";
    const NOUN: &'static str = "Template";
    const STORE_KEY: &'static str = keys::TEMPLATES;
    const COLUMNS: &'static [Column] = &[
        Column::new("name", "Name"),
        Column::new("category", "Category"),
        Column::new("language", "Language"),
        Column::new("body", "Body"),
        Column::new("status", "Status"),
    ];
    const SEARCH_HINT: &'static str = "Search templates...";
    const EXPORT_STEM: &'static str = "templates";

    fn seed() -> Vec<Self> {
        vec![
            Self {
                id: 1,
                name: "Welcome Message".to_string(),
                category: TemplateCategory::Utility,
                language: "en".to_string(),
                body: "Welcome aboard! Reply HELP any time to reach support.".to_string(),
                status: TemplateStatus::Approved,
            },
            Self {
                id: 2,
                name: "Summer Sale".to_string(),
                category: TemplateCategory::Marketing,
                language: "en".to_string(),
                body: "Our summer sale is live. 20% off every plan until Friday.".to_string(),
                status: TemplateStatus::Approved,
            },
            Self {
                id: 3,
                name: "Login Code".to_string(),
                category: TemplateCategory::Authentication,
                language: "en".to_string(),
                body: "Your verification code is {{1}}. It expires in 10 minutes.".to_string(),
                status: TemplateStatus::Approved,
            },
            Self {
                id: 4,
                name: "Abandoned Cart".to_string(),
                category: TemplateCategory::Marketing,
                language: "es".to_string(),
                body: "Todavia tienes articulos en tu carrito. Completa tu compra hoy.".to_string(),
                status: TemplateStatus::Pending,
            },
            Self {
                id: 5,
                name: "Flash Promo".to_string(),
                category: TemplateCategory::Marketing,
                language: "en".to_string(),
                body: "FREE credits!!! Click now!!!".to_string(),
                status: TemplateStatus::Rejected,
            },
        ]
    }

    fn assign_next_id(&mut self, existing: &[Self]) {
        self.id = next_numeric_id(existing);
    }

    fn edit_form(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        text_field(ui, theme, "Name", &mut self.name);
        combo_field(
            ui,
            theme,
            "Category",
            &mut self.category,
            &TemplateCategory::ALL,
            TemplateCategory::as_str,
        );
        string_combo(ui, theme, "Language", &mut self.language, &["en", "es", "de", "fr"]);
        multiline_field(ui, theme, "Body", &mut self.body);
        combo_field(
            ui,
            theme,
            "Status",
            &mut self.status,
            &TemplateStatus::ALL,
            TemplateStatus::as_str,
        );
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        if self.body.trim().is_empty() {
            return Err("Body is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CampaignStatus {
    Draft,
    Running,
    Completed,
    Paused,
}

impl CampaignStatus {
    pub const ALL: [Self; 4] = [Self::Draft, Self::Running, Self::Completed, Self::Paused];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Running => "Running",
            Self::Completed => "Completed",
            Self::Paused => "Paused",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: u64,
    pub name: String,
    pub template: String,
    pub status: CampaignStatus,
    pub recipients: u32,
    pub sent: u32,
    pub opened: u32,
    pub scheduled: NaiveDate,
}

impl Default for Campaign {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            template: String::new(),
            status: CampaignStatus::Draft,
            recipients: 0,
            sent: 0,
            opened: 0,
            scheduled: Local::now().date_naive(),
        }
    }
}

impl Record for Campaign {
    fn id(&self) -> RecordId {
        RecordId::Num(self.id)
    }

    fn field(&self, key: &str) -> String {
        match key {
            "id" => self.id.to_string(),
            "name" => self.name.clone(),
            "template" => self.template.clone(),
            "status" => self.status.as_str().to_string(),
            "recipients" => self.recipients.to_string(),
            "sent" => self.sent.to_string(),
            "opened" => self.opened.to_string(),
            "scheduled" => self.scheduled.to_string(),
            _ => String::new(),
        }
    }
}

impl EntityRecord for Campaign {
    const TITLE: &'static str = "Campaigns";
    const NOUN: &'static str = "Campaign";
    const STORE_KEY: &'static str = keys::CAMPAIGNS;
    const COLUMNS: &'static [Column] = &[
        Column::new("name", "Name"),
        Column::new("template", "Template"),
        Column::new("status", "Status"),
        Column::new("recipients", "Recipients"),
        Column::new("sent", "Sent"),
        Column::new("opened", "Opened"),
        Column::new("scheduled", "Scheduled"),
    ];
    const SEARCH_HINT: &'static str = "Search campaigns...";
    const EXPORT_STEM: &'static str = "campaigns";

    fn seed() -> Vec<Self> {
        vec![
            Self {
                id: 1,
                name: "June Newsletter".to_string(),
                template: "Summer Sale".to_string(),
                status: CampaignStatus::Completed,
                recipients: 1200,
                sent: 1200,
                opened: 431,
                scheduled: date(2024, 6, 1),
            },
            Self {
                id: 2,
                name: "VIP Re-engagement".to_string(),
                template: "Welcome Message".to_string(),
                status: CampaignStatus::Running,
                recipients: 300,
                sent: 120,
                opened: 48,
                scheduled: date(2024, 6, 10),
            },
            Self {
                id: 3,
                name: "July Promo".to_string(),
                template: "Summer Sale".to_string(),
                status: CampaignStatus::Draft,
                recipients: 0,
                sent: 0,
                opened: 0,
                scheduled: date(2024, 7, 1),
            },
            Self {
                id: 4,
                name: "Cart Recovery".to_string(),
                template: "Abandoned Cart".to_string(),
                status: CampaignStatus::Paused,
                recipients: 540,
                sent: 230,
                opened: 61,
                scheduled: date(2024, 6, 5),
            },
        ]
    }

    fn assign_next_id(&mut self, existing: &[Self]) {
        self.id = next_numeric_id(existing);
    }

    fn edit_form(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        text_field(ui, theme, "Name", &mut self.name);
        text_field(ui, theme, "Template", &mut self.template);
        combo_field(
            ui,
            theme,
            "Status",
            &mut self.status,
            &CampaignStatus::ALL,
            CampaignStatus::as_str,
        );
        count_field(ui, theme, "Recipients", &mut self.recipients);
        count_field(ui, theme, "Sent", &mut self.sent);
        count_field(ui, theme, "Opened", &mut self.opened);
        date_field(ui, theme, "Scheduled", &mut self.scheduled);
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        if self.template.trim().is_empty() {
            return Err("Template is required".to_string());
        }
        if self.sent > self.recipients {
            return Err("Sent cannot exceed recipients".to_string());
        }
        if self.opened > self.sent {
            return Err("Opened cannot exceed sent".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campaign_counts_must_stay_ordered() {
        let mut campaign = Campaign {
            id: 1,
            name: "Promo".to_string(),
            template: "Summer Sale".to_string(),
            recipients: 100,
            sent: 100,
            opened: 40,
            ..Campaign::default()
        };
        assert!(campaign.validate().is_ok());

        campaign.sent = 150;
        assert_eq!(
            campaign.validate(),
            Err("Sent cannot exceed recipients".to_string())
        );

        campaign.sent = 30;
        assert_eq!(
            campaign.validate(),
            Err("Opened cannot exceed sent".to_string())
        );
    }

    #[test]
    fn template_requires_a_body() {
        let template = MessageTemplate {
            id: 1,
            name: "Welcome".to_string(),
            ..MessageTemplate::default()
        };
        assert_eq!(template.validate(), Err("Body is required".to_string()));
    }

    #[test]
    fn seeded_campaign_counts_are_internally_consistent() {
        for campaign in Campaign::seed() {
            assert!(campaign.validate().is_ok(), "seed {} invalid", campaign.id);
        }
    }
}
