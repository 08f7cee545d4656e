//! State for the page components that surround the 3D scene
//!
//! The browser crate binds these to DOM events. Keeping the decisions here
//! lets them be tested without a browser.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Widths at or below this are treated as mobile layouts
pub const MOBILE_BREAKPOINT: f64 = 768.0;

/// Space left above a smooth-scroll target for the fixed header
pub const SCROLL_HEADER_OFFSET: f64 = 100.0;

pub const SUBMIT_DELAY_MS: i32 = 2000;
pub const ALERT_AUTO_DISMISS_MS: i32 = 5000;
pub const ALERT_EXIT_MS: i32 = 300;
pub const MODAL_EXIT_MS: i32 = 300;
pub const TOOLTIP_EXIT_MS: i32 = 200;
pub const COUNTER_INTERVAL_MS: i32 = 20;
pub const COUNTER_STEPS: f64 = 100.0;

pub const REVEAL_SELECTOR: &str = ".fade-in, .card, .stat-item";
pub const REVEAL_THRESHOLD: f64 = 0.1;
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";
pub const REVEAL_CLASS: &str = "animated";

/// Things that can happen to the mobile navigation menu
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuEvent {
    ToggleClicked,
    OutsideClick,
    EscapePressed,
    NavLinkClicked { viewport_width: f64 },
    Resized { viewport_width: f64 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuState {
    open: bool,
}

impl MenuState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Apply an event; returns true when the open state changed
    pub fn handle(&mut self, event: MenuEvent) -> bool {
        let next = match event {
            MenuEvent::ToggleClicked => !self.open,
            MenuEvent::OutsideClick | MenuEvent::EscapePressed => false,
            MenuEvent::NavLinkClicked { viewport_width } if viewport_width <= MOBILE_BREAKPOINT => {
                false
            }
            MenuEvent::Resized { viewport_width } if viewport_width > MOBILE_BREAKPOINT => false,
            _ => self.open,
        };
        let changed = next != self.open;
        self.open = next;
        changed
    }

    /// Font Awesome icon class for the toggle button
    pub fn icon_class(&self) -> &'static str {
        if self.open {
            "fas fa-times"
        } else {
            "fas fa-bars"
        }
    }
}

/// Element id targeted by an in-page anchor, if it should smooth-scroll
pub fn scroll_target(href: &str) -> Option<&str> {
    let id = href.strip_prefix('#')?;
    if id.is_empty() || id.starts_with('!') {
        return None;
    }
    Some(id)
}

pub fn scroll_top_for(offset_top: f64) -> f64 {
    offset_top - SCROLL_HEADER_OFFSET
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Info,
    Success,
    Error,
}

impl AlertKind {
    pub fn class_name(&self) -> &'static str {
        match self {
            AlertKind::Info => "alert alert-info",
            AlertKind::Success => "alert alert-success",
            AlertKind::Error => "alert alert-error",
        }
    }

    pub fn background(&self) -> &'static str {
        match self {
            AlertKind::Info => "#3B82F6",
            AlertKind::Success => "#10B981",
            AlertKind::Error => "#EF4444",
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill in all required fields.")]
    MissingFields(Vec<&'static str>),
}

pub const FORM_SUCCESS_MESSAGE: &str =
    "Your message has been sent successfully! We will contact you soon.";

/// Contact form fields as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactSubmission {
    pub fn validate(&self) -> Result<(), FormError> {
        let missing: Vec<&'static str> = [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(FormError::MissingFields(missing))
        }
    }
}

/// Count-up animation for a statistic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterAnimation {
    target: u64,
    increment: f64,
    current: f64,
    finished: bool,
}

impl CounterAnimation {
    pub fn new(target: u64) -> Self {
        Self {
            target,
            increment: target as f64 / COUNTER_STEPS,
            current: 0.0,
            finished: false,
        }
    }

    /// Parse the target from element text the way the page writes it (`"250+"`)
    pub fn from_text(text: &str) -> Option<Self> {
        let digits: String = text
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok().map(Self::new)
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Iterator for CounterAnimation {
    type Item = u64;

    /// Next value to display; the last value is the target itself
    fn next(&mut self) -> Option<u64> {
        if self.finished {
            return None;
        }
        if self.current < self.target as f64 {
            self.current += self.increment;
            Some((self.current.ceil() as u64).min(self.target))
        } else {
            self.finished = true;
            Some(self.target)
        }
    }
}

/// What a gallery item shows in the image modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalContent {
    pub image_src: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl ModalContent {
    /// Pick data attributes first, then the item's own markup
    pub fn resolve(
        data_image: Option<String>,
        img_src: Option<String>,
        data_title: Option<String>,
        title_text: Option<String>,
        data_description: Option<String>,
        description_text: Option<String>,
    ) -> Option<Self> {
        let non_empty = |s: Option<String>| s.filter(|s| !s.is_empty());
        let image_src = non_empty(data_image).or_else(|| non_empty(img_src))?;
        Some(Self {
            image_src,
            title: non_empty(data_title).or_else(|| non_empty(title_text)),
            description: non_empty(data_description).or_else(|| non_empty(description_text)),
        })
    }

    pub fn alt_text(&self) -> &str {
        self.title.as_deref().unwrap_or("Gallery Image")
    }
}

/// Tooltip anchor (horizontal centre, top edge) for an element's client rect
pub fn tooltip_anchor(left: f64, top: f64, width: f64) -> (f64, f64) {
    (left + width / 2.0, top)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_transitions() {
        let mut menu = MenuState::default();
        assert_eq!(menu.icon_class(), "fas fa-bars");

        assert!(menu.handle(MenuEvent::ToggleClicked));
        assert!(menu.is_open());
        assert_eq!(menu.icon_class(), "fas fa-times");

        // Desktop link clicks leave it open
        assert!(!menu.handle(MenuEvent::NavLinkClicked { viewport_width: 1200.0 }));
        assert!(menu.handle(MenuEvent::NavLinkClicked { viewport_width: 768.0 }));
        assert!(!menu.is_open());

        menu.handle(MenuEvent::ToggleClicked);
        assert!(!menu.handle(MenuEvent::Resized { viewport_width: 500.0 }));
        assert!(menu.handle(MenuEvent::Resized { viewport_width: 900.0 }));

        menu.handle(MenuEvent::ToggleClicked);
        assert!(menu.handle(MenuEvent::EscapePressed));
        assert!(!menu.handle(MenuEvent::OutsideClick));
    }

    #[test]
    fn test_scroll_targets() {
        assert_eq!(scroll_target("#services"), Some("services"));
        assert_eq!(scroll_target("#"), None);
        assert_eq!(scroll_target("#!/route"), None);
        assert_eq!(scroll_target("/about"), None);
        assert_eq!(scroll_top_for(640.0), 540.0);
    }

    #[test]
    fn test_contact_validation() {
        let mut form = ContactSubmission {
            name: "Dana".to_string(),
            email: String::new(),
            message: String::new(),
        };
        assert_eq!(
            form.validate(),
            Err(FormError::MissingFields(vec!["email", "message"]))
        );

        form.email = "dana@example.com".to_string();
        form.message = "Hello".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_counter_reaches_target() {
        let values: Vec<u64> = CounterAnimation::new(250).collect();
        assert_eq!(values.len(), 101);
        assert_eq!(values[0], 3);
        assert_eq!(*values.last().unwrap(), 250);
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert!(values.iter().all(|v| *v <= 250));
    }

    #[test]
    fn test_counter_zero_and_text() {
        let values: Vec<u64> = CounterAnimation::new(0).collect();
        assert_eq!(values, vec![0]);

        let counter = CounterAnimation::from_text(" 98%").unwrap();
        assert_eq!(counter.target(), 98);
        assert!(CounterAnimation::from_text("n/a").is_none());
    }

    #[test]
    fn test_modal_content_fallbacks() {
        let content = ModalContent::resolve(
            None,
            Some("img/ward.jpg".to_string()),
            Some(String::new()),
            Some("Ward".to_string()),
            None,
            None,
        )
        .unwrap();
        assert_eq!(content.image_src, "img/ward.jpg");
        assert_eq!(content.alt_text(), "Ward");
        assert!(content.description.is_none());

        assert!(ModalContent::resolve(None, None, None, None, None, None).is_none());
    }

    #[test]
    fn test_alert_styles() {
        assert_eq!(AlertKind::Success.background(), "#10B981");
        assert_eq!(AlertKind::Error.class_name(), "alert alert-error");
        assert_eq!(tooltip_anchor(100.0, 40.0, 60.0), (130.0, 40.0));
    }
}
