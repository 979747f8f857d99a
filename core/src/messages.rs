//! Locales, user-facing message catalog and status labels.
//!
//! Only the strings the client itself emits live here (notifications raised by
//! the executor, form validation and auth flows). Everything else the backend
//! already localizes from the `Accept-Language` header.

use crate::types::{DocumentType, PaymentStatus, TicketStatus, UserRole};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Interface language.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Russian (default)
    #[default]
    Ru,
    /// English
    En,
}

/// Error returned when parsing an unsupported locale tag.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unsupported locale: {0}")]
pub struct UnsupportedLocale(pub String);

impl Locale {
    /// Value sent in the `Accept-Language` header.
    #[must_use]
    pub const fn accept_language(self) -> &'static str {
        match self {
            Self::Ru => "ru",
            Self::En => "en",
        }
    }

    /// Locale tag understood by the map SDK and geocoder.
    #[must_use]
    pub const fn map_lang(self) -> &'static str {
        match self {
            Self::Ru => "ru_RU",
            Self::En => "en_US",
        }
    }

    /// Look up a catalog message.
    #[must_use]
    pub const fn message(self, key: MessageKey) -> &'static str {
        match self {
            Self::Ru => key.ru(),
            Self::En => key.en(),
        }
    }

    /// Label for a ticket status.
    #[must_use]
    pub const fn ticket_status(self, status: TicketStatus) -> &'static str {
        match (self, status) {
            (Self::Ru, TicketStatus::Available) => "Доступен",
            (Self::Ru, TicketStatus::Reserved) => "Забронирован",
            (Self::Ru, TicketStatus::Paid) => "Оплачен",
            (Self::Ru, TicketStatus::Used) => "Использован",
            (Self::Ru, TicketStatus::Cancelled) => "Отменён",
            (Self::En, TicketStatus::Available) => "Available",
            (Self::En, TicketStatus::Reserved) => "Reserved",
            (Self::En, TicketStatus::Paid) => "Paid",
            (Self::En, TicketStatus::Used) => "Used",
            (Self::En, TicketStatus::Cancelled) => "Cancelled",
        }
    }

    /// Label for a payment status.
    #[must_use]
    pub const fn payment_status(self, status: PaymentStatus) -> &'static str {
        match (self, status) {
            (Self::Ru, PaymentStatus::Pending) => "Ожидание оплаты",
            (Self::Ru, PaymentStatus::WaitingForCapture) => "Ожидание подтверждения",
            (Self::Ru, PaymentStatus::Succeeded) => "Оплачено",
            (Self::Ru, PaymentStatus::Canceled) => "Отменено",
            (Self::Ru, PaymentStatus::Failed) => "Ошибка оплаты",
            (Self::En, PaymentStatus::Pending) => "Pending payment",
            (Self::En, PaymentStatus::WaitingForCapture) => "Waiting for confirmation",
            (Self::En, PaymentStatus::Succeeded) => "Paid",
            (Self::En, PaymentStatus::Canceled) => "Canceled",
            (Self::En, PaymentStatus::Failed) => "Payment error",
        }
    }

    /// Label for an identity document type.
    #[must_use]
    pub const fn document_type(self, kind: DocumentType) -> &'static str {
        match (self, kind) {
            (Self::Ru, DocumentType::Passport) => "Паспорт",
            (Self::Ru, DocumentType::DriverLicense) => "Водительское удостоверение",
            (Self::Ru, DocumentType::ForeignPassport) => "Заграничный паспорт",
            (Self::Ru, DocumentType::StudentCard) => "Студенческий билет",
            (Self::Ru, DocumentType::BirthCertificate) => "Свидетельство о рождении",
            (Self::En, DocumentType::Passport) => "Passport",
            (Self::En, DocumentType::DriverLicense) => "Driver's License",
            (Self::En, DocumentType::ForeignPassport) => "Foreign Passport",
            (Self::En, DocumentType::StudentCard) => "Student Card",
            (Self::En, DocumentType::BirthCertificate) => "Birth Certificate",
        }
    }

    /// Label for a user role.
    #[must_use]
    pub const fn user_role(self, role: UserRole) -> &'static str {
        match (self, role) {
            (Self::Ru, UserRole::User) => "Пользователь",
            (Self::Ru, UserRole::Admin) => "Администратор",
            (Self::En, UserRole::User) => "User",
            (Self::En, UserRole::Admin) => "Admin",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.accept_language())
    }
}

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        match tag.split(['-', '_']).next() {
            Some("ru") => Ok(Self::Ru),
            Some("en") => Ok(Self::En),
            _ => Err(UnsupportedLocale(s.to_string())),
        }
    }
}

/// Keys of messages the client emits on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum MessageKey {
    OperationSuccess,
    OperationFailed,
    NetworkError,
    Unexpected,
    FormHasErrors,
    SubmitError,
    LoginSuccess,
    RegisterSuccess,
    PasswordChanged,
    EventCreated,
    EventUpdated,
    EventDeleted,
    TicketCreated,
    TicketUpdated,
    TicketDeleted,
    TicketReserved,
    AttendeeCreated,
    AttendeeUpdated,
    AttendeeDeleted,
    PaymentCreated,
    PaymentUpdated,
    PaymentDeleted,
    UserUpdated,
    UserDeleted,
    ImageUploaded,
    ImageUpdated,
    ImageDeleted,
    CalendarEventAdded,
    CalendarEventUpdated,
    CalendarEventDeleted,
}

impl MessageKey {
    const fn ru(self) -> &'static str {
        match self {
            Self::OperationSuccess => "Операция выполнена успешно",
            Self::OperationFailed => "Не удалось выполнить операцию",
            Self::NetworkError => {
                "Не удалось подключиться к серверу. Проверьте подключение к Интернету или попробуйте позже"
            },
            Self::Unexpected => "Непредвиденная ошибка",
            Self::FormHasErrors => "Пожалуйста, исправьте ошибки в форме",
            Self::SubmitError => "Ошибка при отправке данных",
            Self::LoginSuccess => "Вы успешно вошли в систему",
            Self::RegisterSuccess => "Регистрация успешно завершена",
            Self::PasswordChanged => "Пароль успешно изменен",
            Self::EventCreated => "Событие успешно создано",
            Self::EventUpdated => "Событие обновлено",
            Self::EventDeleted => "Событие удалено",
            Self::TicketCreated => "Билет успешно создан",
            Self::TicketUpdated => "Билет успешно обновлен",
            Self::TicketDeleted => "Билет удален",
            Self::TicketReserved => "Билет успешно забронирован",
            Self::AttendeeCreated => "Участник успешно добавлен",
            Self::AttendeeUpdated => "Данные участника обновлены",
            Self::AttendeeDeleted => "Участник удален",
            Self::PaymentCreated => "Платеж успешно создан",
            Self::PaymentUpdated => "Платеж обновлен",
            Self::PaymentDeleted => "Платеж удален",
            Self::UserUpdated => "Данные пользователя обновлены",
            Self::UserDeleted => "Пользователь удален",
            Self::ImageUploaded => "Изображение успешно загружено",
            Self::ImageUpdated => "Изображение обновлено",
            Self::ImageDeleted => "Изображение удалено",
            Self::CalendarEventAdded => "Событие успешно добавлено в календарь",
            Self::CalendarEventUpdated => "Событие в календаре обновлено",
            Self::CalendarEventDeleted => "Событие удалено из календаря",
        }
    }

    const fn en(self) -> &'static str {
        match self {
            Self::OperationSuccess => "Operation completed successfully",
            Self::OperationFailed => "Operation failed",
            Self::NetworkError => {
                "Could not connect to the server. Check your internet connection or try again later"
            },
            Self::Unexpected => "Unexpected error",
            Self::FormHasErrors => "Please correct the errors in the form",
            Self::SubmitError => "Error submitting data",
            Self::LoginSuccess => "You have successfully logged in",
            Self::RegisterSuccess => "Registration completed successfully",
            Self::PasswordChanged => "Password changed successfully",
            Self::EventCreated => "Event created successfully",
            Self::EventUpdated => "Event updated",
            Self::EventDeleted => "Event deleted",
            Self::TicketCreated => "Ticket created successfully",
            Self::TicketUpdated => "Ticket updated successfully",
            Self::TicketDeleted => "Ticket deleted",
            Self::TicketReserved => "Ticket reserved successfully",
            Self::AttendeeCreated => "Attendee added successfully",
            Self::AttendeeUpdated => "Attendee data updated",
            Self::AttendeeDeleted => "Attendee deleted",
            Self::PaymentCreated => "Payment created successfully",
            Self::PaymentUpdated => "Payment updated",
            Self::PaymentDeleted => "Payment deleted",
            Self::UserUpdated => "User data updated",
            Self::UserDeleted => "User deleted",
            Self::ImageUploaded => "Image uploaded successfully",
            Self::ImageUpdated => "Image updated",
            Self::ImageDeleted => "Image deleted",
            Self::CalendarEventAdded => "Event added successfully",
            Self::CalendarEventUpdated => "Event in calendar updated",
            Self::CalendarEventDeleted => "Event deleted from calendar",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;

    #[test]
    fn test_locale_parsing() {
        assert_eq!("ru".parse::<Locale>().unwrap(), Locale::Ru);
        assert_eq!("en-US".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("EN_gb".parse::<Locale>().unwrap(), Locale::En);
        assert!("de".parse::<Locale>().is_err());
    }

    #[test]
    fn test_header_and_map_tags() {
        assert_eq!(Locale::Ru.accept_language(), "ru");
        assert_eq!(Locale::En.map_lang(), "en_US");
        assert_eq!(Locale::default(), Locale::Ru);
    }

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(Locale::En.message(MessageKey::NetworkError).split('.').next(), Some("Could not connect to the server"));
        assert_eq!(Locale::Ru.message(MessageKey::FormHasErrors), "Пожалуйста, исправьте ошибки в форме");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(Locale::En.ticket_status(TicketStatus::Reserved), "Reserved");
        assert_eq!(Locale::Ru.payment_status(PaymentStatus::Succeeded), "Оплачено");
        assert_eq!(Locale::En.document_type(DocumentType::StudentCard), "Student Card");
        assert_eq!(Locale::Ru.user_role(UserRole::Admin), "Администратор");
    }
}
