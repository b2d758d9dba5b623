pub mod chat;
pub mod crm;
pub mod dashboard;
pub mod entity;
pub mod flow;
pub mod logs;
pub mod marketing;
pub mod sales;
pub mod settings;
pub mod setup;

/// Every routable destination in the console. The sidebar renders
/// `SECTIONS`; routing matches on the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Tenants,
    Subscriptions,
    Invoices,
    Transactions,
    Credits,
    Plans,
    Contacts,
    Templates,
    Campaigns,
    BotFlow,
    Assistant,
    Tickets,
    Staff,
    SystemLogs,
    Settings,
}

impl Page {
    pub const SECTIONS: &'static [(&'static str, &'static [Page])] = &[
        ("Overview", &[Page::Dashboard]),
        (
            "Sales",
            &[
                Page::Subscriptions,
                Page::Invoices,
                Page::Transactions,
                Page::Credits,
                Page::Plans,
            ],
        ),
        ("Clients", &[Page::Tenants, Page::Contacts]),
        ("Marketing", &[Page::Templates, Page::Campaigns]),
        ("AI Assistant", &[Page::Assistant, Page::BotFlow]),
        ("Support", &[Page::Tickets]),
        ("Setup", &[Page::Staff, Page::SystemLogs, Page::Settings]),
    ];

    pub fn label(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Tenants => "Tenants",
            Page::Subscriptions => "Subscriptions",
            Page::Invoices => "Invoices",
            Page::Transactions => "Transactions",
            Page::Credits => "Message Credits",
            Page::Plans => "Plans",
            Page::Contacts => "Contacts",
            Page::Templates => "Templates",
            Page::Campaigns => "Campaigns",
            Page::BotFlow => "Bot Flow",
            Page::Assistant => "AI Chat",
            Page::Tickets => "Support Tickets",
            Page::Staff => "Staff",
            Page::SystemLogs => "System Logs",
            Page::Settings => "Settings",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Page;

    #[test]
    fn every_page_is_reachable_from_exactly_one_section() {
        let mut seen: Vec<Page> = Vec::new();
        for (_, pages) in Page::SECTIONS {
            for page in *pages {
                assert!(!seen.contains(page), "{page:?} listed twice");
                seen.push(*page);
            }
        }
        assert_eq!(seen.len(), 16);
    }
}
