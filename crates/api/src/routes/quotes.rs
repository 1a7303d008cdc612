//! New-Vehicle GST Quote Routes

use axum::Json;
use data_validator::{FuelType, VehicleCategory};
use serde::{Deserialize, Serialize};
use tax_engine::{compute, format_rupees, TaxQuote};

use crate::{error::ApiError, extract::ApiJson};

/// Request body for a new-vehicle quote
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub category: VehicleCategory,
    pub fuel_type: FuelType,
    pub engine_cc: f64,
    /// Ex-showroom price including the old 28% GST
    pub base_price: f64,
}

/// Display strings for the quote's amounts
#[derive(Debug, Serialize)]
pub struct FormattedAmounts {
    pub base_price: String,
    pub new_price: String,
    pub delta: String,
}

/// Response for the quote endpoint
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub quote: TaxQuote,
    pub formatted: FormattedAmounts,
}

/// Price a new vehicle under the revised GST slabs
pub async fn quote_new(
    ApiJson(request): ApiJson<QuoteRequest>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let quote = compute(
        request.category,
        &request.fuel_type,
        request.engine_cc,
        request.base_price,
    )?;

    let formatted = FormattedAmounts {
        base_price: format_rupees(quote.base_price),
        new_price: format_rupees(quote.new_price),
        delta: format_rupees(quote.delta),
    };
    Ok(Json(QuoteResponse { quote, formatted }))
}
