use super::entity::{
    combo_field, date, date_field, next_numeric_id, string_combo, text_field, EntityRecord,
};
use crate::store::keys;
use crate::table::{Column, Record, RecordId};
use crate::theme::Theme;
use chrono::{Local, NaiveDate};
use eframe::egui;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaffRole {
    Admin,
    Manager,
    Agent,
}

impl StaffRole {
    pub const ALL: [Self; 3] = [Self::Admin, Self::Manager, Self::Agent];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::Agent => "Agent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaffStatus {
    Active,
    Inactive,
}

impl StaffStatus {
    pub const ALL: [Self; 2] = [Self::Active, Self::Inactive];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

/// An operator of this console, not a tenant-side user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffUser {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: StaffRole,
    pub department: String,
    pub status: StaffStatus,
    pub joined: NaiveDate,
}

impl Default for StaffUser {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            email: String::new(),
            role: StaffRole::Agent,
            department: "Support".to_string(),
            status: StaffStatus::Active,
            joined: Local::now().date_naive(),
        }
    }
}

impl Record for StaffUser {
    fn id(&self) -> RecordId {
        RecordId::Num(self.id)
    }

    fn field(&self, key: &str) -> String {
        match key {
            "id" => self.id.to_string(),
            "name" => self.name.clone(),
            "email" => self.email.clone(),
            "role" => self.role.as_str().to_string(),
            "department" => self.department.clone(),
            "status" => self.status.as_str().to_string(),
            "joined" => self.joined.to_string(),
            _ => String::new(),
        }
    }
}

impl EntityRecord for StaffUser {
    const TITLE: &'static str = "Staff";
    const NOUN: &'static str = "Staff Member";
    const STORE_KEY: &'static str = keys::STAFF;
    const COLUMNS: &'static [Column] = &[
        Column::new("name", "Name"),
        Column::new("email", "Email"),
        Column::new("role", "Role"),
        Column::new("department", "Department"),
        Column::new("status", "Status"),
        Column::new("joined", "Joined"),
    ];
    const SEARCH_HINT: &'static str = "Search staff...";
    const EXPORT_STEM: &'static str = "staff";

    fn seed() -> Vec<Self> {
        vec![
            Self {
                id: 1,
                name: "Sarah Connor".to_string(),
                email: "sarah@relaydeck.io".to_string(),
                role: StaffRole::Admin,
                department: "Operations".to_string(),
                status: StaffStatus::Active,
                joined: date(2023, 11, 2),
            },
            Self {
                id: 2,
                name: "Miguel Torres".to_string(),
                email: "miguel@relaydeck.io".to_string(),
                role: StaffRole::Manager,
                department: "Sales".to_string(),
                status: StaffStatus::Active,
                joined: date(2024, 1, 8),
            },
            Self {
                id: 3,
                name: "Priya Nair".to_string(),
                email: "priya@relaydeck.io".to_string(),
                role: StaffRole::Agent,
                department: "Support".to_string(),
                status: StaffStatus::Active,
                joined: date(2024, 2, 19),
            },
            Self {
                id: 4,
                name: "Tom Becker".to_string(),
                email: "tom@relaydeck.io".to_string(),
                role: StaffRole::Agent,
                department: "Support".to_string(),
                status: StaffStatus::Inactive,
                joined: date(2024, 3, 30),
            },
        ]
    }

    fn assign_next_id(&mut self, existing: &[Self]) {
        self.id = next_numeric_id(existing);
    }

    fn edit_form(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        text_field(ui, theme, "Name", &mut self.name);
        text_field(ui, theme, "Email", &mut self.email);
        combo_field(
            ui,
            theme,
            "Role",
            &mut self.role,
            &StaffRole::ALL,
            StaffRole::as_str,
        );
        string_combo(
            ui,
            theme,
            "Department",
            &mut self.department,
            &["Operations", "Sales", "Support", "Engineering"],
        );
        combo_field(
            ui,
            theme,
            "Status",
            &mut self.status,
            &StaffStatus::ALL,
            StaffStatus::as_str,
        );
        date_field(ui, theme, "Joined", &mut self.joined);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_email_is_checked_like_tenant_email() {
        let mut user = StaffUser {
            id: 1,
            name: "Ada".to_string(),
            email: "ada.example.com".to_string(),
            ..StaffUser::default()
        };
        assert_eq!(user.validate(), Err("Email must contain @".to_string()));

        user.email = "ada@example.com".to_string();
        assert!(user.validate().is_ok());
    }

    #[test]
    fn new_staff_continue_the_numeric_sequence() {
        let mut user = StaffUser::default();
        user.assign_next_id(&StaffUser::seed());
        assert_eq!(user.id, 5);
    }
}
