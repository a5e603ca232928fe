//! Fixed settings for the two chat surfaces: the full chat page and the floating widget.
//!
//! Each surface owns an independent session; nothing is shared between them.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    FullPage,
    Widget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProfile {
    pub kind: ProfileKind,
    pub greeting: &'static str,
    pub default_location: &'static str,
    pub transport_error_text: &'static str,
    pub quick_replies: &'static [&'static str],
    pub language_selectable: bool,
}

const FULL_PAGE_QUICK_QUESTIONS: &[&str] = &[
    "What's the best local food here?",
    "Is this area safe at night?",
    "Help me order food in local language",
    "What should I be careful about?",
    "Emergency numbers in this city",
    "How to ask for help in local language",
];

const WIDGET_QUICK_REPLIES: &[&str] = &[
    "Need emergency help",
    "Find nearby restaurants",
    "Safety tips for this area",
    "Local emergency numbers",
];

impl SessionProfile {
    pub const fn full_page() -> Self {
        Self {
            kind: ProfileKind::FullPage,
            greeting: "👋 Hello! I'm your travel assistant. I can help with:\n• Local food recommendations 🍽️\n• Safety tips 🛡️\n• Language help 🗣️\n• Emergency info 🚨\n\nWhat would you like to know?",
            default_location: "Paris, France",
            transport_error_text: "I'm having trouble connecting. Please check your internet and try again.",
            quick_replies: FULL_PAGE_QUICK_QUESTIONS,
            language_selectable: true,
        }
    }

    pub const fn widget() -> Self {
        Self {
            kind: ProfileKind::Widget,
            greeting: "Hi! I'm your AI travel assistant. How can I help you today?",
            default_location: "Current Location",
            transport_error_text: "I'm having trouble connecting. Please try again or visit the full Chat page.",
            quick_replies: WIDGET_QUICK_REPLIES,
            language_selectable: false,
        }
    }
}
