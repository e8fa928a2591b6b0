//! # Validation Module
//!
//! Client-side checks run before a form is submitted. The backend stays
//! authoritative; these only catch what can be caught locally and report it
//! in the backend's `field -> [messages]` shape.

use crate::constants::{find_department, MAX_LTV, MIN_LOAN_AMOUNT};
use crate::error::{CoreError, CoreResult, FieldErrors};
use crate::finance::loan_to_value;
use crate::model::{
    BorrowerForm, CollectionForm, Document, Loan, LoanForm, LoanProduct, LoanStatus, PaymentForm,
    Property, PropertyForm,
};
use crate::money::{format_percentage, format_quetzales};
use rust_decimal::Decimal;

/// Accumulates field errors.
#[derive(Debug, Default)]
pub struct Errors(FieldErrors);

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn check(&mut self, ok: bool, field: &str, message: impl Into<String>) {
        if !ok {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn finish(self) -> CoreResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(self.0))
        }
    }
}

fn strip(input: &str, drop: &[char]) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && !drop.contains(c))
        .collect()
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// DPI: 13 digits once spaces and dashes are removed.
pub fn is_valid_dpi(dpi: &str) -> bool {
    let digits = strip(dpi, &['-']);
    digits.len() == 13 && all_digits(&digits)
}

/// NIT: 7 to 9 digits plus an optional check digit (digit or `K`).
pub fn is_valid_nit(nit: &str) -> bool {
    let cleaned = strip(nit, &['-']).to_ascii_uppercase();
    let (body, check) = match cleaned.strip_suffix('K') {
        Some(body) => (body, true),
        None => (cleaned.as_str(), false),
    };
    if !all_digits(body) {
        return false;
    }
    let range = if check { 7..=9 } else { 7..=10 };
    range.contains(&body.len())
}

/// Phone: 8 digits, optionally prefixed with `502`.
pub fn is_valid_phone(phone: &str) -> bool {
    let digits = strip(phone, &['-', '(', ')', '+']);
    if !all_digits(&digits) {
        return false;
    }
    digits.len() == 8 || (digits.len() == 11 && digits.starts_with("502"))
}

/// Registro General de la Propiedad numbers.
pub fn registry_errors(finca: &str, folio: &str, libro: &str, errors: &mut Errors) {
    errors.check(all_digits(finca.trim()), "finca", "Finca must be a number");
    errors.check(all_digits(folio.trim()), "folio", "Folio must be a number");
    errors.check(!libro.trim().is_empty(), "libro", "Libro is required");
}

fn department_errors(department: &str, errors: &mut Errors) {
    errors.check(
        find_department(department).is_some(),
        "department",
        "Select a valid department",
    );
}

pub fn validate_borrower(form: &BorrowerForm) -> CoreResult<()> {
    let mut errors = Errors::new();
    errors.check(is_valid_dpi(&form.dpi), "dpi", "Invalid DPI format. Must be 13 digits.");
    errors.check(!form.first_name.trim().is_empty(), "firstName", "First name is required");
    errors.check(!form.last_name.trim().is_empty(), "lastName", "Last name is required");
    errors.check(
        is_valid_phone(&form.phone),
        "phone",
        "Invalid phone number. Use 8 digits for Guatemala.",
    );
    if let Some(alt) = form.alternate_phone.as_deref().filter(|p| !p.trim().is_empty()) {
        errors.check(
            is_valid_phone(alt),
            "alternatePhone",
            "Invalid phone number. Use 8 digits for Guatemala.",
        );
    }
    if let Some(email) = form.email.as_deref().filter(|e| !e.trim().is_empty()) {
        errors.check(looks_like_email(email), "email", "Invalid email address");
    }
    errors.check(!form.address.trim().is_empty(), "address", "Address is required");
    errors.check(!form.municipality.trim().is_empty(), "municipality", "Municipality is required");
    department_errors(&form.department, &mut errors);
    if let Some(income) = form.monthly_income {
        errors.check(income >= Decimal::ZERO, "monthlyIncome", "Income cannot be negative");
    }
    errors.finish()
}

fn looks_like_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((user, domain)) => !user.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

pub fn validate_property(form: &PropertyForm) -> CoreResult<()> {
    let mut errors = Errors::new();
    registry_errors(&form.finca, &form.folio, &form.libro, &mut errors);
    errors.check(!form.address.trim().is_empty(), "address", "Address is required");
    department_errors(&form.department, &mut errors);
    errors.check(form.area_m2 > Decimal::ZERO, "areaM2", "Value must be a positive number.");
    errors.check(
        form.market_value > Decimal::ZERO,
        "marketValue",
        "Value must be a positive number.",
    );
    if let Some(appraisal) = form.appraisal_value {
        errors.check(
            appraisal > Decimal::ZERO,
            "appraisalValue",
            "Value must be a positive number.",
        );
    }
    errors.finish()
}

/// Loan terms against the product limits and, when known, the collateral.
///
/// A collateral value of zero or less is reported on `propertyId` instead of
/// being read as a zero LTV.
pub fn validate_loan(
    form: &LoanForm,
    product: &LoanProduct,
    collateral_value: Option<Decimal>,
) -> CoreResult<()> {
    let mut errors = Errors::new();
    errors.check(!form.borrower_id.trim().is_empty(), "borrowerId", "Borrower is required");
    errors.check(!form.property_id.trim().is_empty(), "propertyId", "Property is required");

    let min = product.min_amount.max(MIN_LOAN_AMOUNT);
    if form.amount < min {
        errors.add(
            "amount",
            format!("Loan amount below minimum ({})", format_quetzales(min)),
        );
    } else if form.amount > product.max_amount {
        errors.add(
            "amount",
            format!("Loan amount exceeds maximum ({})", format_quetzales(product.max_amount)),
        );
    }

    errors.check(
        (product.min_term_months..=product.max_term_months).contains(&form.term_months),
        "termMonths",
        format!(
            "Term must be between {} and {} months",
            product.min_term_months, product.max_term_months
        ),
    );
    errors.check(
        form.interest_rate >= Decimal::ZERO,
        "interestRate",
        "Interest rate cannot be negative",
    );

    let max_ltv = if product.max_ltv > Decimal::ZERO {
        product.max_ltv
    } else {
        MAX_LTV
    };
    match collateral_value {
        Some(value) if value > Decimal::ZERO => {
            let ltv = loan_to_value(form.amount, value);
            errors.check(
                ltv <= max_ltv,
                "amount",
                format!(
                    "LTV ({}) exceeds maximum ({})",
                    format_percentage(ltv),
                    format_percentage(max_ltv)
                ),
            );
        }
        Some(_) => errors.add("propertyId", "Property has no collateral value"),
        None => {}
    }
    errors.finish()
}

pub fn validate_payment(form: &PaymentForm) -> CoreResult<()> {
    let mut errors = Errors::new();
    errors.check(!form.loan_id.trim().is_empty(), "loanId", "Loan is required");
    errors.check(form.amount > Decimal::ZERO, "amount", "Value must be a positive number.");
    errors.finish()
}

pub fn validate_collection(form: &CollectionForm) -> CoreResult<()> {
    let mut errors = Errors::new();
    errors.check(!form.loan_id.trim().is_empty(), "loanId", "Loan is required");
    if let Some(phone) = form.contact_phone.as_deref().filter(|p| !p.trim().is_empty()) {
        errors.check(
            is_valid_phone(phone),
            "contactPhone",
            "Invalid phone number. Use 8 digits for Guatemala.",
        );
    }
    if form.action_type.requires_promise() {
        errors.check(
            form.promise_amount.map(|a| a > Decimal::ZERO).unwrap_or(false),
            "promiseAmount",
            "Promise amount is required",
        );
        errors.check(form.promise_date.is_some(), "promiseDate", "Promise date is required");
    }
    if form.action_type.requires_extension_date() {
        errors.check(
            form.extension_date.is_some(),
            "extensionDate",
            "Extension date is required",
        );
    }
    errors.finish()
}

/// Gates the backend checks before approval, evaluated on a fetched loan.
///
/// Returns the blocking reasons; empty when the loan looks approvable.
pub fn approval_blockers(loan: &Loan) -> Vec<String> {
    let mut reasons = Vec::new();
    if loan.status != LoanStatus::UnderReview {
        reasons.push("Loan must be under review to approve".to_string());
    }
    if let Some(borrower) = &loan.borrower {
        if !borrower.is_verified() {
            reasons.push("Borrower must be verified".to_string());
        }
    }
    if let Some(property) = &loan.property {
        if !property.is_verified() {
            reasons.push("Property must be verified by Legal".to_string());
        }
    }
    if let Some(product) = &loan.loan_product {
        let ltv = ltv_of(loan, loan.property.as_ref());
        if ltv > product.max_ltv {
            reasons.push(format!(
                "LTV ({}) exceeds maximum ({})",
                format_percentage(ltv),
                format_percentage(product.max_ltv)
            ));
        }
        if loan.amount < product.min_amount {
            reasons.push(format!(
                "Loan amount below minimum ({})",
                format_quetzales(product.min_amount)
            ));
        }
        if loan.amount > product.max_amount {
            reasons.push(format!(
                "Loan amount exceeds maximum ({})",
                format_quetzales(product.max_amount)
            ));
        }
    }
    reasons
}

fn ltv_of(loan: &Loan, property: Option<&Property>) -> Decimal {
    property.map(|p| p.ltv_for(loan.amount)).unwrap_or(loan.ltv)
}

/// Activation requires an approved loan with every contract executed.
pub fn activation_blockers(loan: &Loan, documents: &[Document]) -> Vec<String> {
    let mut reasons = Vec::new();
    if loan.status != LoanStatus::Approved {
        reasons.push("Loan must be approved before activation".to_string());
    }
    let contracts: Vec<&Document> = documents
        .iter()
        .filter(|d| d.document_type.is_contract())
        .collect();
    if contracts.is_empty() || contracts.iter().any(|d| !d.is_executed()) {
        reasons.push("All legal documents must be executed".to_string());
    }
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CollectionActionType, PaymentMethod, PaymentType, RiskTier};
    use rust_decimal_macros::dec;

    fn borrower_form() -> BorrowerForm {
        BorrowerForm {
            dpi: "2456 78901 0101".into(),
            first_name: "María".into(),
            last_name: "López".into(),
            phone: "+502 5555-1234".into(),
            address: "3a Calle 4-56, Zona 1".into(),
            municipality: "Escuintla".into(),
            department: "escuintla".into(),
            risk_tier: RiskTier::Low,
            ..Default::default()
        }
    }

    fn loan_form(amount: Decimal, term: u32) -> LoanForm {
        LoanForm {
            borrower_id: "b-1".into(),
            property_id: "p-1".into(),
            loan_product_id: "standard".into(),
            amount,
            term_months: term,
            interest_rate: dec!(0.10),
        }
    }

    #[test]
    fn test_identifier_formats() {
        assert!(is_valid_dpi("2456789010101"));
        assert!(is_valid_dpi("2456-78901-0101"));
        assert!(!is_valid_dpi("245678901010"));
        assert!(!is_valid_dpi("24567890101OI"));

        assert!(is_valid_nit("1234567-8"));
        assert!(is_valid_nit("1234567K"));
        assert!(is_valid_nit("123456789k"));
        assert!(!is_valid_nit("12345"));
        assert!(!is_valid_nit("12345678901"));

        assert!(is_valid_phone("5555 1234"));
        assert!(is_valid_phone("(502) 5555-1234"));
        assert!(!is_valid_phone("555-1234"));
        assert!(!is_valid_phone("50155551234"));
    }

    #[test]
    fn test_registry() {
        let mut errors = Errors::new();
        registry_errors("1234", "56", "78E", &mut errors);
        assert!(errors.is_empty());

        registry_errors("12a", "", " ", &mut errors);
        let err = errors.finish().unwrap_err();
        let fields = err.field_errors().unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields["libro"], vec!["Libro is required".to_string()]);
    }

    #[test]
    fn test_borrower_form() {
        assert!(validate_borrower(&borrower_form()).is_ok());

        let mut form = borrower_form();
        form.department = "Atlantis".into();
        form.monthly_income = Some(dec!(-1));
        form.email = Some("nope".into());
        let err = validate_borrower(&form).unwrap_err();
        let fields = err.field_errors().unwrap();
        assert!(fields.contains_key("department"));
        assert!(fields.contains_key("monthlyIncome"));
        assert!(fields.contains_key("email"));
        assert!(!fields.contains_key("dpi"));
    }

    #[test]
    fn test_loan_limits() {
        let product = LoanProduct::standard();
        assert!(validate_loan(&loan_form(dec!(100000), 6), &product, Some(dec!(250000))).is_ok());

        let err = validate_loan(&loan_form(dec!(9999.99), 6), &product, None).unwrap_err();
        assert!(err.field_errors().unwrap()["amount"][0].contains("Q10,000.00"));

        let err = validate_loan(&loan_form(dec!(50000), 12), &product, None).unwrap_err();
        assert!(err.field_errors().unwrap().contains_key("termMonths"));
    }

    #[test]
    fn test_loan_ltv() {
        let product = LoanProduct::standard();
        let err = validate_loan(&loan_form(dec!(110000), 6), &product, Some(dec!(250000)))
            .unwrap_err();
        assert_eq!(
            err.field_errors().unwrap()["amount"][0],
            "LTV (44.00%) exceeds maximum (40.00%)"
        );

        let err = validate_loan(&loan_form(dec!(50000), 6), &product, Some(dec!(0))).unwrap_err();
        assert!(err.field_errors().unwrap().contains_key("propertyId"));
    }

    #[test]
    fn test_payment_and_collection_forms() {
        let payment = PaymentForm {
            loan_id: "l-1".into(),
            schedule_id: None,
            amount: dec!(0),
            payment_type: PaymentType::Interest,
            payment_method: PaymentMethod::Cash,
            reference_number: None,
            notes: None,
        };
        assert!(validate_payment(&payment).is_err());

        let promise = CollectionForm {
            loan_id: "l-1".into(),
            action_type: CollectionActionType::PaymentPromise,
            contacted_person: None,
            contact_phone: Some("55551234".into()),
            outcome: None,
            promise_amount: None,
            promise_date: None,
            extension_date: None,
            notes: None,
        };
        let err = validate_collection(&promise).unwrap_err();
        let fields = err.field_errors().unwrap();
        assert!(fields.contains_key("promiseAmount"));
        assert!(fields.contains_key("promiseDate"));
    }

    #[test]
    fn test_activation_blockers() {
        let loan: Loan = serde_json::from_str(
            r#"{"id": "l", "amount": 50000, "termMonths": 3, "interestRate": 0.1, "status": "Approved"}"#,
        )
        .unwrap();
        let docs: Vec<Document> = serde_json::from_str(
            r#"[
                {"id": "d1", "documentType": "Pagare", "status": "Executed"},
                {"id": "d2", "documentType": "MutuoMercantil", "status": "Uploaded"},
                {"id": "d3", "documentType": "DPI", "status": "Pending"}
            ]"#,
        )
        .unwrap();
        assert_eq!(activation_blockers(&loan, &docs).len(), 1);
        assert!(activation_blockers(&loan, &docs[..1]).is_empty());
        assert_eq!(approval_blockers(&loan), vec!["Loan must be under review to approve"]);
    }
}
