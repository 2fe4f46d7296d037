use crate::engine::distribution::{DistributionConfig, IncomeDistribution, compute};
use crate::engine::{datekey, names};
use crate::submission::parse::RawExtraction;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub(crate) struct ValidatedSubmission {
    pub payees: Vec<String>,
    pub gross_amount: f64,
    pub per_person_amount: f64,
    pub controller: String,
    pub superior: String,
    pub superior_present: bool,
    pub order_date: String,
    pub content: String,
    pub config: DistributionConfig,
    pub distribution: IncomeDistribution,
}

pub(crate) fn validate_extraction(extraction: RawExtraction) -> ClientResult<ValidatedSubmission> {
    if !extraction.amount.is_finite() || extraction.amount <= 0.0 {
        return Err(ClientError::submission_validation_failed(
            "`amount` must be a finite number greater than zero.",
        ));
    }

    let mut payees = names::split_payees(&extraction.taker);
    if payees.is_empty() {
        payees.push(names::FALLBACK_PAYEE.to_string());
    }

    let per_person_amount = extraction.amount / payees.len() as f64;
    let superior_present = names::is_effective_person(&extraction.superior);
    let distribution = compute(per_person_amount, extraction.config, superior_present);

    let order_date = if datekey::is_empty_class(&extraction.order_date) {
        datekey::NO_DATE_MARKER.to_string()
    } else {
        extraction.order_date
    };

    Ok(ValidatedSubmission {
        payees,
        gross_amount: extraction.amount,
        per_person_amount,
        controller: extraction.controller,
        superior: extraction.superior,
        superior_present,
        order_date,
        content: extraction.content,
        config: extraction.config,
        distribution,
    })
}
