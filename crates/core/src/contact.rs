//! Ordering contact details.
//!
//! Online ordering is not live yet, so the order page sends customers to
//! the phone lines or WhatsApp instead.

use serde::Serialize;

pub const DEFAULT_PRIMARY_PHONE: &str = "7259322466";
pub const DEFAULT_ALTERNATE_PHONE: &str = "8951603763";
pub const DEFAULT_WHATSAPP_COUNTRY_CODE: &str = "91";

/// Where to send customers who want to place an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderContact {
    pub primary_phone: String,
    pub alternate_phone: Option<String>,
    pub whatsapp_country_code: String,
}

impl Default for OrderContact {
    fn default() -> Self {
        Self {
            primary_phone: DEFAULT_PRIMARY_PHONE.into(),
            alternate_phone: Some(DEFAULT_ALTERNATE_PHONE.into()),
            whatsapp_country_code: DEFAULT_WHATSAPP_COUNTRY_CODE.into(),
        }
    }
}

/// Wire form of [`OrderContact`] with the derived links filled in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderContactView {
    pub online_ordering: &'static str,
    pub primary_phone: String,
    pub primary_tel_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_tel_link: Option<String>,
    pub whatsapp_link: String,
}

impl OrderContact {
    pub fn tel_link(phone: &str) -> String {
        format!("tel:{}", digits(phone))
    }

    /// `https://wa.me/<country code><number>` for the primary line.
    pub fn whatsapp_link(&self) -> String {
        format!(
            "https://wa.me/{}{}",
            digits(&self.whatsapp_country_code),
            digits(&self.primary_phone)
        )
    }

    pub fn view(&self) -> OrderContactView {
        OrderContactView {
            online_ordering: "coming-soon",
            primary_phone: self.primary_phone.clone(),
            primary_tel_link: Self::tel_link(&self.primary_phone),
            alternate_phone: self.alternate_phone.clone(),
            alternate_tel_link: self.alternate_phone.as_deref().map(Self::tel_link),
            whatsapp_link: self.whatsapp_link(),
        }
    }
}

/// Strip spaces, dashes and a leading `+` from a phone number.
fn digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_links() {
        let view = OrderContact::default().view();
        assert_eq!(view.primary_tel_link, "tel:7259322466");
        assert_eq!(view.alternate_tel_link.as_deref(), Some("tel:8951603763"));
        assert_eq!(view.whatsapp_link, "https://wa.me/917259322466");
        assert_eq!(view.online_ordering, "coming-soon");
    }

    #[test]
    fn formatting_is_stripped_from_links() {
        let contact = OrderContact {
            primary_phone: "725-932 2466".into(),
            alternate_phone: None,
            whatsapp_country_code: "+91".into(),
        };
        let view = contact.view();
        assert_eq!(view.primary_tel_link, "tel:7259322466");
        assert_eq!(view.whatsapp_link, "https://wa.me/917259322466");
        assert!(view.alternate_tel_link.is_none());
    }
}
