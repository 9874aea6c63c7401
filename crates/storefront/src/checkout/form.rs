//! Customer and shipping details collected for card payments.

use serde::{Deserialize, Serialize};

use super::CheckoutError;
use crate::payment::{BillingAddress, BillingDetails};

/// Message shown when a required field is blank.
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all required fields.";

/// Country used when the customer does not pick one.
pub const DEFAULT_COUNTRY: &str = "NL";

/// Checkout form fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    pub email: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl Default for CheckoutForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            name: String::new(),
            address: String::new(),
            city: String::new(),
            postal_code: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl CheckoutForm {
    /// Check that every required field is filled in.
    ///
    /// Only presence is checked; formats are left to the payment provider.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Validation`] if a required field is blank.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let required = [
            &self.email,
            &self.name,
            &self.address,
            &self.city,
            &self.postal_code,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(CheckoutError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        }
        Ok(())
    }

    /// Billing details for the payment provider.
    #[must_use]
    pub fn billing_details(&self) -> BillingDetails {
        let country = match self.country.trim() {
            "" => DEFAULT_COUNTRY.to_string(),
            other => other.to_ascii_uppercase(),
        };
        BillingDetails {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            address: BillingAddress {
                line1: self.address.trim().to_string(),
                city: self.city.trim().to_string(),
                postal_code: self.postal_code.trim().to_string(),
                country,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled() -> CheckoutForm {
        CheckoutForm {
            email: "sophie@example.nl".to_string(),
            name: "Sophie de Vries".to_string(),
            address: "Prinsengracht 263".to_string(),
            city: "Amsterdam".to_string(),
            postal_code: "1016 GV".to_string(),
            ..CheckoutForm::default()
        }
    }

    #[test]
    fn test_default_country_is_nl() {
        assert_eq!(CheckoutForm::default().country, "NL");
    }

    #[test]
    fn test_filled_form_is_valid() {
        assert!(filled().validate().is_ok());
    }

    #[test]
    fn test_blank_field_is_rejected() {
        let form = CheckoutForm {
            city: "   ".to_string(),
            ..filled()
        };
        assert_eq!(
            form.validate().unwrap_err(),
            CheckoutError::Validation("Please fill in all required fields.".to_string())
        );
    }

    #[test]
    fn test_billing_details_fall_back_to_default_country() {
        let form = CheckoutForm {
            country: String::new(),
            name: "  Sophie de Vries ".to_string(),
            ..filled()
        };
        let billing = form.billing_details();
        assert_eq!(billing.address.country, "NL");
        assert_eq!(billing.name, "Sophie de Vries");
        assert_eq!(billing.address.line1, "Prinsengracht 263");
    }
}
