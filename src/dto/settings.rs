use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct SaveBankDetailsRequest {
    pub bank_name: String,
    pub account_holder_name: String,
    pub account_number: String,
    pub bank_address: String,
    pub swift_code: Option<String>,
    pub routing_number: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct SaveContactDetailsRequest {
    pub phone_number: String,
    pub email: String,
    pub address: String,
}
