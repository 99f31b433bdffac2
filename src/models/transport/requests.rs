use serde::Deserialize;
use ts_rs::TS;
use uuid::Uuid;

use crate::models::MonthFlags;
use crate::storage::MasterPayload;
use crate::utils::validate::{
    validate_name, validate_non_negative, validate_optional_text, validate_phone,
    validate_time_of_day,
};

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/transport.ts")]
pub struct TransportRouteRequest {
    pub route_name: String,
    pub vehicle_no: Option<String>,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

impl MasterPayload for TransportRouteRequest {
    fn display_name(&self) -> String {
        self.route_name.trim().to_string()
    }

    fn validate(&self) -> Result<(), String> {
        validate_name("Route name", &self.route_name)?;
        validate_optional_text("Vehicle number", self.vehicle_no.as_deref(), 20)?;
        validate_optional_text("Driver name", self.driver_name.as_deref(), 100)?;
        if let Some(phone) = self.driver_phone.as_deref() {
            validate_phone(phone)?;
        }
        Ok(())
    }

    fn columns(&self) -> Vec<(&'static str, sea_orm::Value)> {
        vec![
            ("route_name", self.display_name().into()),
            ("vehicle_no", self.vehicle_no.clone().into()),
            ("driver_name", self.driver_name.clone().into()),
            ("driver_phone", self.driver_phone.clone().into()),
            ("sort_order", self.sort_order.into()),
        ]
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/transport.ts")]
pub struct TransportPickupRequest {
    pub route_id: Uuid,
    pub pickup_name: String,
    pub pickup_time: Option<String>,
    #[serde(default)]
    pub fee_amount: f64,
    #[serde(default)]
    pub months: MonthFlags,
    #[serde(default)]
    pub sort_order: i32,
}

impl MasterPayload for TransportPickupRequest {
    fn display_name(&self) -> String {
        self.pickup_name.trim().to_string()
    }

    fn validate(&self) -> Result<(), String> {
        validate_name("Pickup name", &self.pickup_name)?;
        if let Some(time) = self.pickup_time.as_deref() {
            validate_time_of_day(time)?;
        }
        validate_non_negative("Fee amount", self.fee_amount)
    }

    fn columns(&self) -> Vec<(&'static str, sea_orm::Value)> {
        let mut columns = vec![
            ("route_id", self.route_id.into()),
            ("pickup_name", self.display_name().into()),
            ("pickup_time", self.pickup_time.clone().into()),
            ("fee_amount", self.fee_amount.into()),
            ("sort_order", self.sort_order.into()),
        ];
        columns.extend(self.months.columns());
        columns
    }

    fn references(&self) -> Vec<(&'static str, Uuid)> {
        vec![("route_id", self.route_id)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pickup_columns_include_months() {
        let req: TransportPickupRequest = serde_json::from_value(serde_json::json!({
            "route_id": Uuid::new_v4(),
            "pickup_name": "Bus Stand",
            "pickup_time": "07:15",
            "fee_amount": 450.0,
            "months": { "jun": true, "jul": true }
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        let cols = req.columns();
        assert_eq!(cols.len(), 17);
        assert!(cols.iter().any(|(c, _)| *c == "fee_jun"));
        assert!(req.months.jun && req.months.jul && !req.months.jan);
    }

    #[test]
    fn test_pickup_rejects_bad_time_and_negative_fee() {
        let mut req = TransportPickupRequest {
            route_id: Uuid::new_v4(),
            pickup_name: "Market".into(),
            pickup_time: Some("7.15".into()),
            fee_amount: 100.0,
            months: MonthFlags::default(),
            sort_order: 0,
        };
        assert!(req.validate().is_err());
        req.pickup_time = None;
        req.fee_amount = -5.0;
        assert!(req.validate().is_err());
    }
}
