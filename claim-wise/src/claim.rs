use serde::{Deserialize, Serialize};
use std::fmt;

/// The attributes a claim form is made of, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimField {
    MonthsAsCustomer,
    Age,
    #[serde(rename = "policy_deductable")]
    PolicyDeductible,
    PolicyAnnualPremium,
    UmbrellaLimit,
    CapitalGains,
    CapitalLoss,
    IncidentHourOfTheDay,
    NumberOfVehiclesInvolved,
    BodilyInjuries,
    Witnesses,
    TotalClaimAmount,
    InjuryClaim,
    PropertyClaim,
    VehicleClaim,
    AutoYear,
}

impl ClaimField {
    pub const ALL: [ClaimField; 16] = [
        ClaimField::MonthsAsCustomer,
        ClaimField::Age,
        ClaimField::PolicyDeductible,
        ClaimField::PolicyAnnualPremium,
        ClaimField::UmbrellaLimit,
        ClaimField::CapitalGains,
        ClaimField::CapitalLoss,
        ClaimField::IncidentHourOfTheDay,
        ClaimField::NumberOfVehiclesInvolved,
        ClaimField::BodilyInjuries,
        ClaimField::Witnesses,
        ClaimField::TotalClaimAmount,
        ClaimField::InjuryClaim,
        ClaimField::PropertyClaim,
        ClaimField::VehicleClaim,
        ClaimField::AutoYear,
    ];

    /// Column name used by the claims dataset and the JSON form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimField::MonthsAsCustomer => "months_as_customer",
            ClaimField::Age => "age",
            ClaimField::PolicyDeductible => "policy_deductable",
            ClaimField::PolicyAnnualPremium => "policy_annual_premium",
            ClaimField::UmbrellaLimit => "umbrella_limit",
            ClaimField::CapitalGains => "capital_gains",
            ClaimField::CapitalLoss => "capital_loss",
            ClaimField::IncidentHourOfTheDay => "incident_hour_of_the_day",
            ClaimField::NumberOfVehiclesInvolved => "number_of_vehicles_involved",
            ClaimField::BodilyInjuries => "bodily_injuries",
            ClaimField::Witnesses => "witnesses",
            ClaimField::TotalClaimAmount => "total_claim_amount",
            ClaimField::InjuryClaim => "injury_claim",
            ClaimField::PropertyClaim => "property_claim",
            ClaimField::VehicleClaim => "vehicle_claim",
            ClaimField::AutoYear => "auto_year",
        }
    }

    /// Human readable form label.
    pub fn label(&self) -> &'static str {
        match self {
            ClaimField::MonthsAsCustomer => "Months as Customer",
            ClaimField::Age => "Age",
            ClaimField::PolicyDeductible => "Policy Deductible",
            ClaimField::PolicyAnnualPremium => "Annual Premium",
            ClaimField::UmbrellaLimit => "Umbrella Limit",
            ClaimField::CapitalGains => "Capital Gains",
            ClaimField::CapitalLoss => "Capital Loss",
            ClaimField::IncidentHourOfTheDay => "Incident Hour",
            ClaimField::NumberOfVehiclesInvolved => "Vehicles Involved",
            ClaimField::BodilyInjuries => "Bodily Injuries",
            ClaimField::Witnesses => "Witnesses",
            ClaimField::TotalClaimAmount => "Total Claim Amount",
            ClaimField::InjuryClaim => "Injury Claim",
            ClaimField::PropertyClaim => "Property Claim",
            ClaimField::VehicleClaim => "Vehicle Claim",
            ClaimField::AutoYear => "Vehicle Year",
        }
    }

    /// Advisory input bounds shown on the form. Nothing enforces them.
    pub fn bounds(&self) -> FieldBounds {
        match self {
            ClaimField::IncidentHourOfTheDay => FieldBounds::new(Some(0.0), Some(23.0)),
            ClaimField::NumberOfVehiclesInvolved => FieldBounds::new(Some(1.0), None),
            ClaimField::BodilyInjuries | ClaimField::Witnesses => {
                FieldBounds::new(Some(0.0), None)
            }
            ClaimField::AutoYear => FieldBounds::new(Some(1980.0), None),
            _ => FieldBounds::default(),
        }
    }
}

impl fmt::Display for ClaimField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FieldBounds {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Claim attributes submitted for fraud analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClaimInput {
    pub months_as_customer: f64,
    pub age: f64,
    #[serde(rename = "policy_deductable")]
    pub policy_deductible: f64,
    pub policy_annual_premium: f64,
    pub umbrella_limit: f64,
    pub capital_gains: f64,
    pub capital_loss: f64,
    pub incident_hour_of_the_day: f64,
    pub number_of_vehicles_involved: f64,
    pub bodily_injuries: f64,
    pub witnesses: f64,
    pub total_claim_amount: f64,
    pub injury_claim: f64,
    pub property_claim: f64,
    pub vehicle_claim: f64,
    pub auto_year: f64,
}

impl ClaimInput {
    pub fn get(&self, field: ClaimField) -> f64 {
        match field {
            ClaimField::MonthsAsCustomer => self.months_as_customer,
            ClaimField::Age => self.age,
            ClaimField::PolicyDeductible => self.policy_deductible,
            ClaimField::PolicyAnnualPremium => self.policy_annual_premium,
            ClaimField::UmbrellaLimit => self.umbrella_limit,
            ClaimField::CapitalGains => self.capital_gains,
            ClaimField::CapitalLoss => self.capital_loss,
            ClaimField::IncidentHourOfTheDay => self.incident_hour_of_the_day,
            ClaimField::NumberOfVehiclesInvolved => self.number_of_vehicles_involved,
            ClaimField::BodilyInjuries => self.bodily_injuries,
            ClaimField::Witnesses => self.witnesses,
            ClaimField::TotalClaimAmount => self.total_claim_amount,
            ClaimField::InjuryClaim => self.injury_claim,
            ClaimField::PropertyClaim => self.property_claim,
            ClaimField::VehicleClaim => self.vehicle_claim,
            ClaimField::AutoYear => self.auto_year,
        }
    }

    /// Iterate `(field, value)` pairs in form order.
    pub fn fields(&self) -> impl Iterator<Item = (ClaimField, f64)> + '_ {
        ClaimField::ALL.into_iter().map(|field| (field, self.get(field)))
    }

    /// Fields whose value lies outside the advisory form bounds.
    pub fn out_of_bounds(&self) -> Vec<ClaimField> {
        self.fields()
            .filter(|(field, value)| !field.bounds().contains(*value))
            .map(|(field, _)| field)
            .collect()
    }
}

impl Default for ClaimInput {
    fn default() -> Self {
        Self {
            months_as_customer: 400.0,
            age: 45.0,
            policy_deductible: 1000.0,
            policy_annual_premium: 850.50,
            umbrella_limit: 0.0,
            capital_gains: 0.0,
            capital_loss: 0.0,
            incident_hour_of_the_day: 14.0,
            number_of_vehicles_involved: 2.0,
            bodily_injuries: 1.0,
            witnesses: 2.0,
            total_claim_amount: 12000.0,
            injury_claim: 20000.0,
            property_claim: 3000.0,
            vehicle_claim: 7000.0,
            auto_year: 2015.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_match_serialized_keys() {
        let value = serde_json::to_value(ClaimInput::default()).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), ClaimField::ALL.len());
        for field in ClaimField::ALL {
            assert!(object.contains_key(field.as_str()), "missing {}", field);
            let serialized = serde_json::to_value(field).unwrap();
            assert_eq!(serialized, field.as_str());
        }
    }

    #[test]
    fn out_of_bounds_is_reported_not_rejected() {
        let input = ClaimInput {
            incident_hour_of_the_day: 25.0,
            witnesses: -1.0,
            ..ClaimInput::default()
        };

        assert_eq!(
            input.out_of_bounds(),
            vec![ClaimField::IncidentHourOfTheDay, ClaimField::Witnesses]
        );
        assert!(ClaimInput::default().out_of_bounds().is_empty());
    }
}
