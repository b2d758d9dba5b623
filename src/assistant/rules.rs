use super::Responder;

enum Trigger {
    /// Every keyword must appear in the lowercased input.
    All(&'static [&'static str]),
    /// Any one keyword suffices.
    Any(&'static [&'static str]),
}

impl Trigger {
    fn matches(&self, lower: &str) -> bool {
        match self {
            Trigger::All(words) => words.iter().all(|word| lower.contains(word)),
            Trigger::Any(words) => words.iter().any(|word| lower.contains(word)),
        }
    }
}

struct Rule {
    trigger: Trigger,
    reply: &'static str,
}

/// Checked top to bottom; the first hit answers. Keyword matching is plain
/// substring containment, so ordering decides ties.
const RULES: &[Rule] = &[
    Rule {
        trigger: Trigger::All(&["what", "platform"]),
        reply: "RelayDeck is a multi-tenant messaging marketing platform. You manage tenants, \
                subscriptions, campaigns and message templates from this console, and every \
                change is stored locally on your machine.",
    },
    Rule {
        trigger: Trigger::Any(&["requirement", "version"]),
        reply: "The console is self-contained: no server, no database and no external services. \
                All state lives under your home directory and a standard desktop environment is \
                the only requirement.",
    },
    Rule {
        trigger: Trigger::Any(&["install", "setup"]),
        reply: "Setup is three steps: launch the console, look over the seeded sample data, and \
                replace it with your own tenants and plans. Settings persist the moment you \
                save them.",
    },
    Rule {
        trigger: Trigger::Any(&["subscription", "plan", "billing"]),
        reply: "Plans come in Starter, Professional and Enterprise tiers with monthly or yearly \
                billing. Create or retire plans on the Plans page and subscriptions pick them \
                up right away.",
    },
    Rule {
        trigger: Trigger::Any(&["tenant", "client"]),
        reply: "Each tenant is an isolated customer workspace with its own plan and status. Use \
                the Tenants page to onboard, suspend or update them.",
    },
    Rule {
        trigger: Trigger::Any(&["campaign", "message"]),
        reply: "Campaigns send template-based messages to your contact lists. Recipients, \
                deliveries and opens are tracked per campaign on the Campaigns page.",
    },
    Rule {
        trigger: Trigger::Any(&["api", "webhook"]),
        reply: "Outbound integrations are configured per tenant. Webhook endpoints receive \
                campaign delivery events, and the API mirrors what this console can do.",
    },
    Rule {
        trigger: Trigger::Any(&["help", "support"]),
        reply: "Raise a ticket on the Support page and the team picks it up by priority. High \
                priority tickets are answered first.",
    },
    Rule {
        trigger: Trigger::Any(&["hello", "hi", "hey"]),
        reply: "Hello! I can answer questions about tenants, plans, campaigns and the rest of \
                the console. What would you like to know?",
    },
    Rule {
        trigger: Trigger::Any(&["thank"]),
        reply: "You're welcome! Happy to help with anything else.",
    },
];

/// The canned rule set behind the chat page. Total: when no rule matches,
/// the fallback echoes the question back.
pub struct ScriptedResponder;

impl Responder for ScriptedResponder {
    fn respond(&self, input: &str) -> String {
        let lower = input.to_lowercase();
        for rule in RULES {
            if rule.trigger.matches(&lower) {
                return rule.reply.to_string();
            }
        }
        format!(
            "I understand you're asking about \"{input}\". Could you narrow that down to \
             tenants, plans, campaigns, templates or support so I can point you at the right \
             page?"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn respond(input: &str) -> String {
        ScriptedResponder.respond(input)
    }

    #[test]
    fn platform_question_needs_both_keywords() {
        let reply = respond("What is this platform for?");
        assert!(reply.contains("multi-tenant messaging marketing platform"));

        // "platform" alone skips the all-of rule and falls through.
        let reply = respond("platform");
        assert!(reply.starts_with("I understand you're asking about"));
    }

    #[test]
    fn earlier_rules_win_ties() {
        // "install" (third rule) and "help" (eighth) both match; order decides.
        let reply = respond("I need help with the install");
        assert!(reply.contains("Setup is three steps"));
    }

    #[test]
    fn any_of_triggers_fire_on_a_single_keyword() {
        assert!(respond("how does billing work").contains("Starter, Professional and Enterprise"));
        assert!(respond("suspend a client").contains("Tenants page"));
        assert!(respond("webhook events").contains("Outbound integrations"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let reply = respond("INSTALL NOW");
        assert!(reply.contains("Setup is three steps"));
    }

    #[test]
    fn greeting_and_thanks_have_dedicated_replies() {
        assert!(respond("hey there").starts_with("Hello!"));
        assert!(respond("thank you so much").starts_with("You're welcome"));
    }

    #[test]
    fn fallback_echoes_the_question() {
        let reply = respond("quantum flux capacitors");
        assert!(reply.contains("\"quantum flux capacitors\""));
    }

    #[test]
    fn every_input_gets_a_reply() {
        for input in ["", "   ", "zzz", "???", "a"] {
            assert!(!respond(input).is_empty());
        }
    }
}
