use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub streetaddress: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(rename = "_links")]
    pub links: CustomerLinks,
}

impl Customer {
    pub fn self_href(&self) -> &str {
        &self.links.self_link.href
    }

    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.firstname.as_deref().unwrap_or_default(),
            self.lastname.as_deref().unwrap_or_default()
        )
    }

    /// Returns the value of `field`, reading a missing value as empty.
    pub fn field(&self, field: CustomerField) -> &str {
        let value = match field {
            CustomerField::Firstname => &self.firstname,
            CustomerField::Lastname => &self.lastname,
            CustomerField::Email => &self.email,
            CustomerField::Phone => &self.phone,
            CustomerField::Streetaddress => &self.streetaddress,
            CustomerField::Postcode => &self.postcode,
            CustomerField::City => &self.city,
        };
        value.as_deref().unwrap_or_default()
    }

    pub fn to_form(&self) -> CustomerForm {
        CustomerForm {
            firstname: self.field(CustomerField::Firstname).to_string(),
            lastname: self.field(CustomerField::Lastname).to_string(),
            email: self.field(CustomerField::Email).to_string(),
            phone: self.field(CustomerField::Phone).to_string(),
            streetaddress: self.field(CustomerField::Streetaddress).to_string(),
            postcode: self.field(CustomerField::Postcode).to_string(),
            city: self.field(CustomerField::City).to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerField {
    Firstname,
    Lastname,
    Email,
    Phone,
    Streetaddress,
    Postcode,
    City,
}

impl CustomerField {
    pub const ALL: [CustomerField; 7] = [
        CustomerField::Firstname,
        CustomerField::Lastname,
        CustomerField::Email,
        CustomerField::Phone,
        CustomerField::Streetaddress,
        CustomerField::Postcode,
        CustomerField::City,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CustomerField::Firstname => "firstname",
            CustomerField::Lastname => "lastname",
            CustomerField::Email => "email",
            CustomerField::Phone => "phone",
            CustomerField::Streetaddress => "streetaddress",
            CustomerField::Postcode => "postcode",
            CustomerField::City => "city",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CustomerField::Firstname => "First name",
            CustomerField::Lastname => "Last name",
            CustomerField::Email => "Email",
            CustomerField::Phone => "Phone",
            CustomerField::Streetaddress => "Address",
            CustomerField::Postcode => "Postcode",
            CustomerField::City => "City",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Training {
    #[serde(default)]
    pub date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(rename = "_links")]
    pub links: TrainingLinks,
}

impl Training {
    pub fn self_href(&self) -> &str {
        &self.links.self_link.href
    }

    pub fn customer_href(&self) -> Option<&str> {
        self.links.customer.as_ref().map(|link| link.href.as_str())
    }
}

/// A training with its customer resolved through `_links.customer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinedTraining {
    #[serde(flatten)]
    pub training: Training,
    pub customer: Option<Customer>,
}

impl JoinedTraining {
    pub fn customer_name(&self) -> String {
        match &self.customer {
            Some(customer) => customer.full_name(),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    pub fn display_date(&self) -> String {
        self.training
            .date
            .map(|date| format_display_date(&date))
            .unwrap_or_default()
    }
}

pub fn format_display_date(date: &DateTime<FixedOffset>) -> String {
    date.with_timezone(&Local).format("%d.%m.%Y %H:%M").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrainingField {
    Date,
    Activity,
    Duration,
    CustomerName,
}

impl TrainingField {
    pub const ALL: [TrainingField; 4] = [
        TrainingField::Date,
        TrainingField::Activity,
        TrainingField::Duration,
        TrainingField::CustomerName,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TrainingField::Date => "date",
            TrainingField::Activity => "activity",
            TrainingField::Duration => "duration",
            TrainingField::CustomerName => "customerName",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrainingField::Date => "Date",
            TrainingField::Activity => "Activity",
            TrainingField::Duration => "Duration (min)",
            TrainingField::CustomerName => "Customer",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerForm {
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub streetaddress: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainingForm {
    pub date: DateTime<FixedOffset>,
    pub activity: String,
    pub duration: i64,
    pub customer: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmbeddedCustomers {
    #[serde(default)]
    pub customers: Vec<Customer>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CustomersResponse {
    #[serde(rename = "_embedded", default)]
    pub embedded: EmbeddedCustomers,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmbeddedTrainings {
    #[serde(default)]
    pub trainings: Vec<Training>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrainingsResponse {
    #[serde(rename = "_embedded", default)]
    pub embedded: EmbeddedTrainings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub severity: Severity,
    pub text: String,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityStats {
    pub activity: String,
    pub duration: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub title: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub training: String,
}
