use sea_orm::FromQueryResult;
use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

use crate::models::MonthFlags;

#[derive(Debug, Clone, Serialize, FromQueryResult, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/transport.ts")]
pub struct TransportRoute {
    pub id: Uuid,
    pub route_name: String,
    pub vehicle_no: Option<String>,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_date: i64,
    pub modified_by: Option<Uuid>,
    pub modified_date: Option<i64>,
}

#[derive(Debug, Clone, Serialize, FromQueryResult, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/transport.ts")]
pub struct TransportPickup {
    pub id: Uuid,
    pub route_id: Uuid,
    pub pickup_name: String,
    // HH:MM
    pub pickup_time: Option<String>,
    pub fee_amount: f64,
    pub fee_jan: bool,
    pub fee_feb: bool,
    pub fee_mar: bool,
    pub fee_apr: bool,
    pub fee_may: bool,
    pub fee_jun: bool,
    pub fee_jul: bool,
    pub fee_aug: bool,
    pub fee_sep: bool,
    pub fee_oct: bool,
    pub fee_nov: bool,
    pub fee_dec: bool,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_date: i64,
    pub modified_by: Option<Uuid>,
    pub modified_date: Option<i64>,
}

impl TransportPickup {
    pub fn months(&self) -> MonthFlags {
        MonthFlags::from_array([
            self.fee_jan,
            self.fee_feb,
            self.fee_mar,
            self.fee_apr,
            self.fee_may,
            self.fee_jun,
            self.fee_jul,
            self.fee_aug,
            self.fee_sep,
            self.fee_oct,
            self.fee_nov,
            self.fee_dec,
        ])
    }
}
