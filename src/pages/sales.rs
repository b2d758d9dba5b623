use super::entity::{
    combo_field, date, date_field, money, money_field, multiline_field, next_numeric_id,
    next_prefixed_id, string_combo, text_field, EntityRecord,
};
use crate::store::keys;
use crate::table::{Column, Record, RecordId};
use crate::theme::Theme;
use chrono::{Local, NaiveDate};
use eframe::egui;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub const ALL: [Self; 2] = [Self::Monthly, Self::Yearly];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
    PastDue,
}

impl SubscriptionStatus {
    pub const ALL: [Self; 3] = [Self::Active, Self::Cancelled, Self::PastDue];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Cancelled => "Cancelled",
            Self::PastDue => "Past Due",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: u64,
    pub tenant: String,
    pub plan: String,
    pub billing: BillingCycle,
    pub amount: f64,
    pub status: SubscriptionStatus,
    pub next_billing: NaiveDate,
}

impl Default for Subscription {
    fn default() -> Self {
        Self {
            id: 0,
            tenant: String::new(),
            plan: "Starter".to_string(),
            billing: BillingCycle::Monthly,
            amount: 0.0,
            status: SubscriptionStatus::Active,
            next_billing: Local::now().date_naive(),
        }
    }
}

impl Record for Subscription {
    fn id(&self) -> RecordId {
        RecordId::Num(self.id)
    }

    fn field(&self, key: &str) -> String {
        match key {
            "id" => self.id.to_string(),
            "tenant" => self.tenant.clone(),
            "plan" => self.plan.clone(),
            "billing" => self.billing.as_str().to_string(),
            "amount" => money(self.amount),
            "status" => self.status.as_str().to_string(),
            "next_billing" => self.next_billing.to_string(),
            _ => String::new(),
        }
    }
}

impl EntityRecord for Subscription {
    const TITLE: &'static str = "Subscriptions";
    const NOUN: &'static str = "Subscription";
    const STORE_KEY: &'static str = keys::SUBSCRIPTIONS;
    const COLUMNS: &'static [Column] = &[
        Column::new("tenant", "Tenant"),
        Column::new("plan", "Plan"),
        Column::new("billing", "Billing"),
        Column::new("amount", "Amount"),
        Column::new("status", "Status"),
        Column::new("next_billing", "Next Billing"),
    ];
    const SEARCH_HINT: &'static str = "Search subscriptions...";
    const EXPORT_STEM: &'static str = "subscriptions";

    fn seed() -> Vec<Self> {
        vec![
            Self {
                id: 1,
                tenant: "Acme Corp".to_string(),
                plan: "Enterprise".to_string(),
                billing: BillingCycle::Yearly,
                amount: 5000.0,
                status: SubscriptionStatus::Active,
                next_billing: date(2025, 1, 15),
            },
            Self {
                id: 2,
                tenant: "Tech Solutions".to_string(),
                plan: "Professional".to_string(),
                billing: BillingCycle::Monthly,
                amount: 200.0,
                status: SubscriptionStatus::Active,
                next_billing: date(2024, 7, 20),
            },
            Self {
                id: 3,
                tenant: "Global Inc".to_string(),
                plan: "Starter".to_string(),
                billing: BillingCycle::Monthly,
                amount: 100.0,
                status: SubscriptionStatus::PastDue,
                next_billing: date(2024, 6, 10),
            },
            Self {
                id: 4,
                tenant: "Digital Agency".to_string(),
                plan: "Professional".to_string(),
                billing: BillingCycle::Yearly,
                amount: 2000.0,
                status: SubscriptionStatus::Active,
                next_billing: date(2025, 4, 5),
            },
            Self {
                id: 5,
                tenant: "StartupXYZ".to_string(),
                plan: "Starter".to_string(),
                billing: BillingCycle::Monthly,
                amount: 100.0,
                status: SubscriptionStatus::Cancelled,
                next_billing: date(2024, 6, 12),
            },
        ]
    }

    fn assign_next_id(&mut self, existing: &[Self]) {
        self.id = next_numeric_id(existing);
    }

    fn edit_form(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        text_field(ui, theme, "Tenant", &mut self.tenant);
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
            "Billing",
            &mut self.billing,
            &BillingCycle::ALL,
            BillingCycle::as_str,
        );
        money_field(ui, theme, "Amount", &mut self.amount);
        combo_field(
            ui,
            theme,
            "Status",
            &mut self.status,
            &SubscriptionStatus::ALL,
            SubscriptionStatus::as_str,
        );
        date_field(ui, theme, "Next Billing", &mut self.next_billing);
    }

    fn validate(&self) -> Result<(), String> {
        if self.tenant.trim().is_empty() {
            return Err("Tenant is required".to_string());
        }
        if self.plan.trim().is_empty() {
            return Err("Plan is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Paid,
    Pending,
    Overdue,
}

impl InvoiceStatus {
    pub const ALL: [Self; 3] = [Self::Paid, Self::Pending, Self::Overdue];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Pending => "Pending",
            Self::Overdue => "Overdue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub tenant: String,
    pub amount: f64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

impl Default for Invoice {
    fn default() -> Self {
        Self {
            id: String::new(),
            tenant: String::new(),
            amount: 0.0,
            status: InvoiceStatus::Pending,
            date: Local::now().date_naive(),
        }
    }
}

impl Record for Invoice {
    fn id(&self) -> RecordId {
        RecordId::Text(self.id.clone())
    }

    fn field(&self, key: &str) -> String {
        match key {
            "id" => self.id.clone(),
            "tenant" => self.tenant.clone(),
            "amount" => money(self.amount),
            "status" => self.status.as_str().to_string(),
            "date" => self.date.to_string(),
            _ => String::new(),
        }
    }
}

impl EntityRecord for Invoice {
    const TITLE: &'static str = "Invoices";
    const NOUN: &'static str = "Invoice";
    const STORE_KEY: &'static str = keys::INVOICES;
    const COLUMNS: &'static [Column] = &[
        Column::new("id", "Invoice"),
        Column::new("tenant", "Tenant"),
        Column::new("amount", "Amount"),
        Column::new("status", "Status"),
        Column::new("date", "Date"),
    ];
    const SEARCH_HINT: &'static str = "Search invoices...";
    const EXPORT_STEM: &'static str = "invoices";

    fn seed() -> Vec<Self> {
        vec![
            Self {
                id: "INV-001".to_string(),
                tenant: "Acme Corp".to_string(),
                amount: 5000.0,
                status: InvoiceStatus::Paid,
                date: date(2024, 1, 15),
            },
            Self {
                id: "INV-002".to_string(),
                tenant: "Tech Solutions".to_string(),
                amount: 200.0,
                status: InvoiceStatus::Paid,
                date: date(2024, 5, 20),
            },
            Self {
                id: "INV-003".to_string(),
                tenant: "Global Inc".to_string(),
                amount: 100.0,
                status: InvoiceStatus::Overdue,
                date: date(2024, 5, 10),
            },
            Self {
                id: "INV-004".to_string(),
                tenant: "Digital Agency".to_string(),
                amount: 2000.0,
                status: InvoiceStatus::Paid,
                date: date(2024, 4, 5),
            },
            Self {
                id: "INV-005".to_string(),
                tenant: "StartupXYZ".to_string(),
                amount: 100.0,
                status: InvoiceStatus::Pending,
                date: date(2024, 6, 1),
            },
        ]
    }

    fn assign_next_id(&mut self, existing: &[Self]) {
        self.id = next_prefixed_id(existing, "INV");
    }

    fn edit_form(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        text_field(ui, theme, "Tenant", &mut self.tenant);
        money_field(ui, theme, "Amount", &mut self.amount);
        combo_field(
            ui,
            theme,
            "Status",
            &mut self.status,
            &InvoiceStatus::ALL,
            InvoiceStatus::as_str,
        );
        date_field(ui, theme, "Date", &mut self.date);
    }

    fn validate(&self) -> Result<(), String> {
        if self.tenant.trim().is_empty() {
            return Err("Tenant is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Payment,
    Refund,
}

impl TransactionKind {
    pub const ALL: [Self; 2] = [Self::Payment, Self::Refund];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Payment => "Payment",
            Self::Refund => "Refund",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Completed,
    Pending,
    Failed,
}

impl TransactionStatus {
    pub const ALL: [Self; 3] = [Self::Completed, Self::Pending, Self::Failed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Pending => "Pending",
            Self::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub tenant: String,
    pub kind: TransactionKind,
    pub amount: f64,
    pub status: TransactionStatus,
    pub date: NaiveDate,
}

impl Default for Transaction {
    fn default() -> Self {
        Self {
            id: String::new(),
            tenant: String::new(),
            kind: TransactionKind::Payment,
            amount: 0.0,
            status: TransactionStatus::Completed,
            date: Local::now().date_naive(),
        }
    }
}

impl Record for Transaction {
    fn id(&self) -> RecordId {
        RecordId::Text(self.id.clone())
    }

    fn field(&self, key: &str) -> String {
        match key {
            "id" => self.id.clone(),
            "tenant" => self.tenant.clone(),
            "kind" => self.kind.as_str().to_string(),
            "amount" => money(self.amount),
            "status" => self.status.as_str().to_string(),
            "date" => self.date.to_string(),
            _ => String::new(),
        }
    }
}

impl EntityRecord for Transaction {
    const TITLE: &'static str = "Transactions";
    const NOUN: &'static str = "Transaction";
    const STORE_KEY: &'static str = keys::TRANSACTIONS;
    const COLUMNS: &'static [Column] = &[
        Column::new("id", "Transaction"),
        Column::new("tenant", "Tenant"),
        Column::new("kind", "Type"),
        Column::new("amount", "Amount"),
        Column::new("status", "Status"),
        Column::new("date", "Date"),
    ];
    const SEARCH_HINT: &'static str = "Search transactions...";
    const EXPORT_STEM: &'static str = "transactions";

    fn seed() -> Vec<Self> {
        vec![
            Self {
                id: "TXN-001".to_string(),
                tenant: "Acme Corp".to_string(),
                kind: TransactionKind::Payment,
                amount: 5000.0,
                status: TransactionStatus::Completed,
                date: date(2024, 1, 15),
            },
            Self {
                id: "TXN-002".to_string(),
                tenant: "Tech Solutions".to_string(),
                kind: TransactionKind::Payment,
                amount: 200.0,
                status: TransactionStatus::Completed,
                date: date(2024, 5, 20),
            },
            Self {
                id: "TXN-003".to_string(),
                tenant: "Global Inc".to_string(),
                kind: TransactionKind::Payment,
                amount: 100.0,
                status: TransactionStatus::Failed,
                date: date(2024, 5, 10),
            },
            Self {
                id: "TXN-004".to_string(),
                tenant: "StartupXYZ".to_string(),
                kind: TransactionKind::Refund,
                amount: 100.0,
                status: TransactionStatus::Completed,
                date: date(2024, 5, 25),
            },
            Self {
                id: "TXN-005".to_string(),
                tenant: "Digital Agency".to_string(),
                kind: TransactionKind::Payment,
                amount: 2000.0,
                status: TransactionStatus::Pending,
                date: date(2024, 6, 2),
            },
        ]
    }

    fn assign_next_id(&mut self, existing: &[Self]) {
        self.id = next_prefixed_id(existing, "TXN");
    }

    fn edit_form(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        text_field(ui, theme, "Tenant", &mut self.tenant);
        combo_field(
            ui,
            theme,
            "Type",
            &mut self.kind,
            &TransactionKind::ALL,
            TransactionKind::as_str,
        );
        money_field(ui, theme, "Amount", &mut self.amount);
        combo_field(
            ui,
            theme,
            "Status",
            &mut self.status,
            &TransactionStatus::ALL,
            TransactionStatus::as_str,
        );
        date_field(ui, theme, "Date", &mut self.date);
    }

    fn validate(&self) -> Result<(), String> {
        if self.tenant.trim().is_empty() {
            return Err("Tenant is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditAccount {
    pub id: u64,
    pub tenant: String,
    pub balance: f64,
    pub used: f64,
    pub updated: NaiveDate,
}

impl CreditAccount {
    pub fn available(&self) -> f64 {
        self.balance - self.used
    }
}

impl Default for CreditAccount {
    fn default() -> Self {
        Self {
            id: 0,
            tenant: String::new(),
            balance: 0.0,
            used: 0.0,
            updated: Local::now().date_naive(),
        }
    }
}

impl Record for CreditAccount {
    fn id(&self) -> RecordId {
        RecordId::Num(self.id)
    }

    fn field(&self, key: &str) -> String {
        match key {
            "id" => self.id.to_string(),
            "tenant" => self.tenant.clone(),
            "balance" => money(self.balance),
            "used" => money(self.used),
            "available" => money(self.available()),
            "updated" => self.updated.to_string(),
            _ => String::new(),
        }
    }
}

impl EntityRecord for CreditAccount {
    const TITLE: &'static str = "Message Credits";
    const NOUN: &'static str = "Credit Account";
    const STORE_KEY: &'static str = keys::CREDITS;
    const COLUMNS: &'static [Column] = &[
        Column::new("tenant", "Tenant"),
        Column::new("balance", "Balance"),
        Column::new("used", "Used"),
        Column::new("available", "Available"),
        Column::new("updated", "Updated"),
    ];
    const SEARCH_HINT: &'static str = "Search credits...";
    const EXPORT_STEM: &'static str = "credits";

    fn seed() -> Vec<Self> {
        vec![
            Self {
                id: 1,
                tenant: "Acme Corp".to_string(),
                balance: 10000.0,
                used: 4200.0,
                updated: date(2024, 6, 1),
            },
            Self {
                id: 2,
                tenant: "Tech Solutions".to_string(),
                balance: 2000.0,
                used: 1850.0,
                updated: date(2024, 6, 3),
            },
            Self {
                id: 3,
                tenant: "Global Inc".to_string(),
                balance: 500.0,
                used: 500.0,
                updated: date(2024, 5, 28),
            },
            Self {
                id: 4,
                tenant: "Digital Agency".to_string(),
                balance: 4000.0,
                used: 900.0,
                updated: date(2024, 6, 7),
            },
        ]
    }

    fn assign_next_id(&mut self, existing: &[Self]) {
        self.id = next_numeric_id(existing);
    }

    fn edit_form(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        text_field(ui, theme, "Tenant", &mut self.tenant);
        money_field(ui, theme, "Balance", &mut self.balance);
        money_field(ui, theme, "Used", &mut self.used);
        date_field(ui, theme, "Updated", &mut self.updated);
    }

    fn validate(&self) -> Result<(), String> {
        if self.tenant.trim().is_empty() {
            return Err("Tenant is required".to_string());
        }
        if self.used > self.balance {
            return Err("Used credit cannot exceed the balance".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanStatus {
    Active,
    Archived,
}

impl PlanStatus {
    pub const ALL: [Self; 2] = [Self::Active, Self::Archived];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Archived => "Archived",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub billing: BillingCycle,
    /// Comma-separated feature list, shown verbatim in the table.
    pub features: String,
    pub status: PlanStatus,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            price: 0.0,
            billing: BillingCycle::Monthly,
            features: String::new(),
            status: PlanStatus::Active,
        }
    }
}

impl Record for Plan {
    fn id(&self) -> RecordId {
        RecordId::Num(self.id)
    }

    fn field(&self, key: &str) -> String {
        match key {
            "id" => self.id.to_string(),
            "name" => self.name.clone(),
            "price" => money(self.price),
            "billing" => self.billing.as_str().to_string(),
            "features" => self.features.clone(),
            "status" => self.status.as_str().to_string(),
            _ => String::new(),
        }
    }
}

impl EntityRecord for Plan {
    const TITLE: &'static str = "Plans";
    const NOUN: &'static str = "Plan";
    const STORE_KEY: &'static str = keys::PLANS;
    const COLUMNS: &'static [Column] = &[
        Column::new("name", "Name"),
        Column::new("price", "Price"),
        Column::new("billing", "Billing"),
        Column::new("features", "Features"),
        Column::new("status", "Status"),
    ];
    const SEARCH_HINT: &'static str = "Search plans...";
    const EXPORT_STEM: &'static str = "plans";

    fn seed() -> Vec<Self> {
        vec![
            Self {
                id: 1,
                name: "Starter".to_string(),
                price: 100.0,
                billing: BillingCycle::Monthly,
                features: "1,000 messages, 1 bot flow, email support".to_string(),
                status: PlanStatus::Active,
            },
            Self {
                id: 2,
                name: "Professional".to_string(),
                price: 200.0,
                billing: BillingCycle::Monthly,
                features: "10,000 messages, 5 bot flows, priority support".to_string(),
                status: PlanStatus::Active,
            },
            Self {
                id: 3,
                name: "Enterprise".to_string(),
                price: 500.0,
                billing: BillingCycle::Monthly,
                features: "Unlimited messages, unlimited flows, dedicated support".to_string(),
                status: PlanStatus::Active,
            },
            Self {
                id: 4,
                name: "Legacy Basic".to_string(),
                price: 1000.0,
                billing: BillingCycle::Yearly,
                features: "5,000 messages, closed to new signups".to_string(),
                status: PlanStatus::Archived,
            },
        ]
    }

    fn assign_next_id(&mut self, existing: &[Self]) {
        self.id = next_numeric_id(existing);
    }

    fn edit_form(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        text_field(ui, theme, "Name", &mut self.name);
        money_field(ui, theme, "Price", &mut self.price);
        combo_field(
            ui,
            theme,
            "Billing",
            &mut self.billing,
            &BillingCycle::ALL,
            BillingCycle::as_str,
        );
        multiline_field(ui, theme, "Features", &mut self.features);
        combo_field(
            ui,
            theme,
            "Status",
            &mut self.status,
            &PlanStatus::ALL,
            PlanStatus::as_str,
        );
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::export;

    #[test]
    fn available_credit_is_derived_from_balance_and_used() {
        let account = CreditAccount {
            id: 1,
            tenant: "Acme".to_string(),
            balance: 1000.0,
            used: 250.0,
            ..CreditAccount::default()
        };
        assert_eq!(account.available(), 750.0);
        assert_eq!(account.field("available"), "$750");
    }

    #[test]
    fn overdrawn_credit_fails_validation() {
        let account = CreditAccount {
            id: 1,
            tenant: "Acme".to_string(),
            balance: 100.0,
            used: 150.0,
            ..CreditAccount::default()
        };
        assert!(account.validate().is_err());
    }

    #[test]
    fn invoice_and_transaction_ids_continue_their_prefixes() {
        let mut invoice = Invoice::default();
        invoice.assign_next_id(&Invoice::seed());
        assert_eq!(invoice.id, "INV-006");

        let mut txn = Transaction::default();
        txn.assign_next_id(&Transaction::seed());
        assert_eq!(txn.id, "TXN-006");
    }

    #[test]
    fn amounts_render_as_currency_in_table_cells() {
        let subscription = &Subscription::seed()[0];
        assert_eq!(subscription.field("amount"), "$5000");

        let invoice = Invoice {
            amount: 99.5,
            ..Invoice::default()
        };
        assert_eq!(invoice.field("amount"), "$99.50");
    }

    #[test]
    fn plan_features_with_commas_are_quoted_in_csv() {
        let plans = Plan::seed();
        let rows: Vec<&Plan> = plans.iter().collect();
        let csv = export::to_csv(&rows, Plan::COLUMNS);
        assert!(csv.contains("\"1,000 messages, 1 bot flow, email support\""));
    }
}
