use super::crm::Tenant;
use super::entity::{money, EntityRecord};
use super::logs::ActivityLog;
use super::marketing::Campaign;
use super::sales::{CreditAccount, Invoice, InvoiceStatus, Subscription};
use super::Page;
use crate::notify::NotificationHub;
use crate::store::LocalStore;
use crate::table::view::subtle_button;
use crate::theme::Theme;
use eframe::egui::{self, Color32, RichText};
use std::collections::BTreeMap;

#[derive(Debug, Default, PartialEq)]
pub struct DashboardStats {
    pub subscriptions: usize,
    pub earnings: f64,
    pub tenants: usize,
    pub campaigns: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsageRow {
    pub tenant: String,
    pub used: f64,
    pub balance: f64,
}

impl UsageRow {
    /// Fraction of the credit balance already spent, clamped so corrupt
    /// slots cannot overflow the bar.
    pub fn ratio(&self) -> f32 {
        if self.balance <= 0.0 {
            0.0
        } else {
            (self.used / self.balance).clamp(0.0, 1.0) as f32
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanSales {
    pub plan: String,
    pub count: usize,
}

pub fn stats_from(
    subscriptions: &[Subscription],
    invoices: &[Invoice],
    tenants: &[Tenant],
    campaigns: &[Campaign],
) -> DashboardStats {
    let earnings = invoices
        .iter()
        .filter(|invoice| invoice.status == InvoiceStatus::Paid)
        .map(|invoice| invoice.amount)
        .sum();
    DashboardStats {
        subscriptions: subscriptions.len(),
        earnings,
        tenants: tenants.len(),
        campaigns: campaigns.len(),
    }
}

pub fn usage_rows(credits: &[CreditAccount]) -> Vec<UsageRow> {
    credits
        .iter()
        .map(|account| UsageRow {
            tenant: account.tenant.clone(),
            used: account.used,
            balance: account.balance,
        })
        .collect()
}

/// Subscription counts per plan name, busiest first, ties by name.
pub fn plan_sales(subscriptions: &[Subscription]) -> Vec<PlanSales> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for subscription in subscriptions {
        *counts.entry(subscription.plan.clone()).or_insert(0) += 1;
    }
    let mut sales: Vec<PlanSales> = counts
        .into_iter()
        .map(|(plan, count)| PlanSales { plan, count })
        .collect();
    sales.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.plan.cmp(&b.plan)));
    sales
}

/// Landing page. Reads every slot it reports on once at construction and
/// again on demand; nothing here writes to the store.
pub struct DashboardPage {
    store: LocalStore,
    stats: DashboardStats,
    usage: Vec<UsageRow>,
    top_plans: Vec<PlanSales>,
}

impl DashboardPage {
    pub fn new(store: LocalStore) -> Self {
        let mut page = Self {
            store,
            stats: DashboardStats::default(),
            usage: Vec::new(),
            top_plans: Vec::new(),
        };
        page.reload();
        page
    }

    pub fn reload(&mut self) {
        let subscriptions: Vec<Subscription> =
            self.store.get(Subscription::STORE_KEY, Subscription::seed());
        let invoices: Vec<Invoice> = self.store.get(Invoice::STORE_KEY, Invoice::seed());
        let tenants: Vec<Tenant> = self.store.get(Tenant::STORE_KEY, Tenant::seed());
        let campaigns: Vec<Campaign> = self.store.get(Campaign::STORE_KEY, Campaign::seed());
        let credits: Vec<CreditAccount> =
            self.store.get(CreditAccount::STORE_KEY, CreditAccount::seed());

        self.stats = stats_from(&subscriptions, &invoices, &tenants, &campaigns);
        self.usage = usage_rows(&credits);
        self.top_plans = plan_sales(&subscriptions);
    }

    /// Returns the page a card link asked to jump to, if any.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        hub: &NotificationHub,
        log: &mut ActivityLog,
    ) -> Option<Page> {
        ui.horizontal(|ui| {
            ui.heading("Dashboard");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if subtle_button(ui, theme, "Refresh") {
                    self.reload();
                    hub.info("Dashboard refreshed");
                    log.push("dashboard refreshed".to_string());
                }
            });
        });
        ui.add_space(theme.spacing_8);

        ui.columns(4, |columns| {
            stat_card(
                &mut columns[0],
                theme,
                "Subscriptions",
                self.stats.subscriptions.to_string(),
                theme.info,
            );
            stat_card(
                &mut columns[1],
                theme,
                "Earnings",
                money(self.stats.earnings),
                theme.success,
            );
            stat_card(
                &mut columns[2],
                theme,
                "Clients",
                self.stats.tenants.to_string(),
                theme.accent_primary,
            );
            stat_card(
                &mut columns[3],
                theme,
                "Campaigns",
                self.stats.campaigns.to_string(),
                theme.warning,
            );
        });
        ui.add_space(theme.spacing_16);

        let mut goto = None;
        ui.columns(2, |columns| {
            if let Some(page) = self.usage_card(&mut columns[0], theme) {
                goto = Some(page);
            }
            if let Some(page) = self.plans_card(&mut columns[1], theme) {
                goto = Some(page);
            }
        });
        goto
    }

    fn usage_card(&self, ui: &mut egui::Ui, theme: &Theme) -> Option<Page> {
        theme
            .card_frame()
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                let mut goto = None;
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Usage & Limits").strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if subtle_button(ui, theme, "Manage Credits") {
                            goto = Some(Page::Credits);
                        }
                    });
                });
                ui.add_space(theme.spacing_8);
                if self.usage.is_empty() {
                    ui.label(RichText::new("No credit accounts yet").color(theme.text_muted));
                    return goto;
                }
                egui::Grid::new("usage-limits")
                    .num_columns(3)
                    .spacing(egui::vec2(theme.spacing_12, theme.spacing_8))
                    .show(ui, |ui| {
                        for row in &self.usage {
                            ui.label(&row.tenant);
                            ui.add(
                                egui::ProgressBar::new(row.ratio())
                                    .desired_width(160.0)
                                    .fill(usage_color(theme, row.ratio())),
                            );
                            ui.label(
                                RichText::new(format!(
                                    "{} / {}",
                                    money(row.used),
                                    money(row.balance)
                                ))
                                .color(theme.text_muted)
                                .size(12.0),
                            );
                            ui.end_row();
                        }
                    });
                goto
            })
            .inner
    }

    fn plans_card(&self, ui: &mut egui::Ui, theme: &Theme) -> Option<Page> {
        theme
            .card_frame()
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                let mut goto = None;
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Best Selling Plans").strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if subtle_button(ui, theme, "View Plans") {
                            goto = Some(Page::Plans);
                        }
                    });
                });
                ui.add_space(theme.spacing_8);
                if self.top_plans.is_empty() {
                    ui.label(RichText::new("No subscriptions yet").color(theme.text_muted));
                    return goto;
                }
                for (rank, sales) in self.top_plans.iter().enumerate() {
                    ui.horizontal(|ui| {
                        theme.pill_frame(theme.info_tint).show(ui, |ui| {
                            ui.label(
                                RichText::new(format!("#{}", rank + 1))
                                    .color(theme.info)
                                    .size(12.0),
                            );
                        });
                        ui.label(&sales.plan);
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(
                                RichText::new(format!("{} subscriptions", sales.count))
                                    .color(theme.text_muted)
                                    .size(12.0),
                            );
                        });
                    });
                }
                goto
            })
            .inner
    }
}

fn stat_card(ui: &mut egui::Ui, theme: &Theme, label: &str, value: String, accent: Color32) {
    theme.card_frame().show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(label).color(theme.text_muted).size(12.0));
        ui.label(RichText::new(value).color(accent).size(22.0).strong());
    });
}

fn usage_color(theme: &Theme, ratio: f32) -> Color32 {
    if ratio >= 1.0 {
        theme.danger
    } else if ratio >= 0.8 {
        theme.warning
    } else {
        theme.accent_primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earnings_count_only_paid_invoices() {
        let stats = stats_from(
            &Subscription::seed(),
            &Invoice::seed(),
            &Tenant::seed(),
            &Campaign::seed(),
        );
        assert_eq!(stats.subscriptions, 5);
        assert_eq!(stats.earnings, 7200.0);
        assert_eq!(stats.tenants, 5);
        assert_eq!(stats.campaigns, 4);
    }

    #[test]
    fn plan_sales_sort_busiest_first_with_name_ties() {
        let sales = plan_sales(&Subscription::seed());
        let ordered: Vec<(&str, usize)> = sales
            .iter()
            .map(|s| (s.plan.as_str(), s.count))
            .collect();
        assert_eq!(
            ordered,
            vec![("Professional", 2), ("Starter", 2), ("Enterprise", 1)]
        );
    }

    #[test]
    fn usage_ratio_clamps_overdrawn_and_empty_accounts() {
        let overdrawn = UsageRow {
            tenant: "A".to_string(),
            used: 150.0,
            balance: 100.0,
        };
        assert_eq!(overdrawn.ratio(), 1.0);

        let empty = UsageRow {
            tenant: "B".to_string(),
            used: 0.0,
            balance: 0.0,
        };
        assert_eq!(empty.ratio(), 0.0);
    }
}
