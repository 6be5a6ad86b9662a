//! J&T Express client.
//!
//! Tracking uses a JSON body with HTTP basic auth. The order, cancel, tariff and waybill calls
//! post form fields whose payload is signed as `base64(md5_hex(json + key))`.

use super::{CarrierClient, CarrierError, TrackingResponse};
use crate::config::{CarrierSettings, ShipperProfile};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Duration, NaiveDateTime, Timelike, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

/// Jakarta is UTC+7 all year.
const JAKARTA_OFFSET_HOURS: i64 = 7;
/// Pickups requested at or after this hour are scheduled for the next day.
const PICKUP_CUTOFF_HOUR: u32 = 17;

/// `base64(md5_hex(payload + key))`.
pub fn sign(payload: &str, key: &str) -> String {
    let raw = format!("{payload}{key}");
    let digest = format!("{:x}", chksum_md5::hash(raw.as_bytes()));
    STANDARD.encode(digest)
}

/// Compact JSON of `data` and its signature.
fn signed<T: Serialize>(data: &T, key: &str) -> Result<(String, String), CarrierError> {
    let json = serde_json::to_string(data).map_err(|e| CarrierError::Decode(e.to_string()))?;
    let signature = sign(&json, key);
    Ok((json, signature))
}

/// Order date and pickup window, formatted in Jakarta local time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickupWindow {
    pub order_date: String,
    pub start: String,
    pub end: String,
}

impl PickupWindow {
    /// Pickup runs 12:00 to 17:00 today, or tomorrow once the cutoff has passed.
    pub fn at(now: DateTime<Utc>) -> Self {
        let local: NaiveDateTime = now.naive_utc() + Duration::hours(JAKARTA_OFFSET_HOURS);
        let pickup_day = if local.hour() >= PICKUP_CUTOFF_HOUR {
            local + Duration::days(1)
        } else {
            local
        };
        let day = pickup_day.format("%Y-%m-%d");
        Self {
            order_date: local.format("%Y-%m-%d %H:%M:%S").to_string(),
            start: format!("{day} 12:00:00"),
            end: format!("{day} 17:00:00"),
        }
    }
}

/// Receiver side of a shipment, as supplied by the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRequest {
    pub orderid: String,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub receiver_addr: String,
    pub receiver_zip: String,
    pub destination_code: String,
    pub receiver_area: String,
    pub item_name: String,
    /// Cash-on-delivery amount, as the carrier expects it: a decimal string.
    pub cod: String,
    pub goodsvalue: String,
}

#[derive(Serialize)]
struct OrderDetail<'a> {
    username: &'a str,
    api_key: &'a str,
    shipper_name: &'a str,
    shipper_contact: &'a str,
    shipper_phone: &'a str,
    shipper_addr: &'a str,
    origin_code: &'a str,
    qty: &'static str,
    weight: &'static str,
    goodsdesc: &'static str,
    servicetype: &'static str,
    insurance: &'static str,
    orderdate: String,
    sendstarttime: String,
    sendendtime: String,
    expresstype: &'static str,
    #[serde(flatten)]
    request: &'a ShipmentRequest,
}

#[derive(Serialize)]
struct CancelDetail<'a> {
    orderid: &'a str,
    remark: &'a str,
    username: &'a str,
    api_key: &'a str,
}

#[derive(Serialize)]
struct Wrapper<T> {
    detail: [T; 1],
}

#[derive(Serialize)]
struct TrackQuery<'a> {
    awb: &'a str,
    eccompanyid: &'a str,
}

/// Tariff lookup from the fixed send site to a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TariffQuery {
    pub weight: String,
    pub dest_area_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TariffPayload<'a> {
    #[serde(flatten)]
    query: &'a TariffQuery,
    send_site_code: &'a str,
    cus_name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WaybillPayload<'a> {
    #[serde(rename = "customerid")]
    customer_id: &'a str,
    billcode: &'a str,
    #[serde(rename = "printmode")]
    print_mode: &'a str,
    print_type: &'a str,
}

#[derive(Clone)]
pub struct JntClient {
    client: Client,
    settings: CarrierSettings,
}

impl JntClient {
    pub fn new(settings: CarrierSettings) -> Result<Self, CarrierError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| CarrierError::Config(e.to_string()))?;
        Ok(Self { client, settings })
    }

    fn shipper(&self) -> &ShipperProfile {
        &self.settings.shipper
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, CarrierError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CarrierError::Status {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|e| CarrierError::Decode(e.to_string()))
    }

    async fn post_form(&self, url: String, form: &[(&str, &str)]) -> Result<Value, CarrierError> {
        debug!(%url, "Posting carrier form");
        let response = self.client.post(&url).form(form).send().await?;
        Self::decode(response).await
    }

    /// Books a pickup for `request`. Returns the carrier's response as is.
    #[instrument(skip(self, request), fields(orderid = %request.orderid))]
    pub async fn create_order(&self, request: &ShipmentRequest) -> Result<Value, CarrierError> {
        self.create_order_at(request, Utc::now()).await
    }

    async fn create_order_at(
        &self,
        request: &ShipmentRequest,
        now: DateTime<Utc>,
    ) -> Result<Value, CarrierError> {
        let window = PickupWindow::at(now);
        let shipper = self.shipper();
        let detail = OrderDetail {
            username: &self.settings.order_username,
            api_key: &self.settings.order_api_key,
            shipper_name: &shipper.name,
            shipper_contact: &shipper.contact,
            shipper_phone: &shipper.phone,
            shipper_addr: &shipper.address,
            origin_code: &shipper.origin_code,
            qty: "1",
            weight: "1",
            goodsdesc: "Sparklore's Barang",
            servicetype: "1",
            insurance: "250",
            orderdate: window.order_date,
            sendstarttime: window.start,
            sendendtime: window.end,
            expresstype: "EZ",
            request,
        };
        let (data_param, data_sign) = signed(&Wrapper { detail: [detail] }, &self.settings.order_key)?;
        let url = format!(
            "{}/jts-idn-ecommerce-api/api/order/create",
            self.settings.order_base_url
        );
        self.post_form(url, &[("data_param", data_param.as_str()), ("data_sign", data_sign.as_str())])
            .await
    }

    #[instrument(skip(self))]
    pub async fn cancel_order(&self, orderid: &str, remark: &str) -> Result<Value, CarrierError> {
        let detail = CancelDetail {
            orderid,
            remark,
            username: &self.settings.order_username,
            api_key: &self.settings.order_api_key,
        };
        let (data_param, data_sign) = signed(&Wrapper { detail: [detail] }, &self.settings.order_key)?;
        let url = format!(
            "{}/jts-idn-ecommerce-api/api/order/cancel",
            self.settings.order_base_url
        );
        self.post_form(url, &[("data_param", data_param.as_str()), ("data_sign", data_sign.as_str())])
            .await
    }

    #[instrument(skip(self))]
    pub async fn tariff_check(&self, query: &TariffQuery) -> Result<Value, CarrierError> {
        let payload = TariffPayload {
            query,
            send_site_code: &self.shipper().send_site_code,
            cus_name: &self.settings.ecompany_id,
        };
        let (data, sign) = signed(&payload, &self.settings.tariff_key)?;
        let url = format!("{}/jandt_track/inquiry.action", self.settings.general_base_url);
        self.post_form(url, &[("data", data.as_str()), ("sign", sign.as_str())]).await
    }

    /// Requests a printable label link for `billcode`.
    #[instrument(skip(self))]
    pub async fn print_waybill(&self, billcode: &str) -> Result<Value, CarrierError> {
        let payload = WaybillPayload {
            customer_id: &self.settings.ecompany_id,
            billcode,
            print_mode: "1",
            print_type: "1",
        };
        let (logistics_interface, data_digest) = signed(&payload, &self.settings.track_password)?;
        let url = format!(
            "{}/jandt_order_web/labels/labelsAction!getPrintUrl.action",
            self.settings.general_base_url
        );
        self.post_form(
            url,
            &[
                ("logistics_interface", logistics_interface.as_str()),
                ("data_digest", data_digest.as_str()),
                ("msg_type", "ROTAPRINT"),
                ("eccompanyid", self.settings.ecompany_id.as_str()),
            ],
        )
        .await
    }
}

#[async_trait]
impl CarrierClient for JntClient {
    #[instrument(skip(self))]
    async fn track(&self, billcode: &str) -> Result<TrackingResponse, CarrierError> {
        let url = format!(
            "{}/jandt_track/track/trackAction!tracking.action",
            self.settings.general_base_url
        );
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.settings.ecompany_id, Some(&self.settings.track_password))
            .json(&TrackQuery {
                awb: billcode,
                eccompanyid: &self.settings.ecompany_id,
            })
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use std::time::Duration as StdDuration;
    use wiremock::matchers::{body_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(base_url: &str) -> CarrierSettings {
        CarrierSettings {
            order_base_url: base_url.to_string(),
            general_base_url: base_url.to_string(),
            order_key: "order-key".into(),
            order_username: "SPARKLORE".into(),
            order_api_key: "api-key".into(),
            tariff_key: "tariff-key".into(),
            track_password: "track-pass".into(),
            ecompany_id: "SPARKLORE".into(),
            timeout: StdDuration::from_secs(5),
            shipper: ShipperProfile::default(),
        }
    }

    #[test]
    fn test_signature_is_base64_of_hex_digest() {
        // md5("") = d41d8cd98f00b204e9800998ecf8427e
        assert_eq!(
            sign("", ""),
            STANDARD.encode("d41d8cd98f00b204e9800998ecf8427e")
        );
        assert_ne!(sign("{\"a\":1}", "k1"), sign("{\"a\":1}", "k2"));
    }

    #[test]
    fn test_pickup_window_rolls_over_after_cutoff() {
        // 09:30 UTC = 16:30 in Jakarta
        let before = Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, 0).unwrap();
        let window = PickupWindow::at(before);
        assert_eq!(window.order_date, "2025-03-10 16:30:00");
        assert_eq!(window.start, "2025-03-10 12:00:00");
        assert_eq!(window.end, "2025-03-10 17:00:00");

        // 10:00 UTC = 17:00 in Jakarta
        let after = Utc.with_ymd_and_hms(2025, 3, 10, 10, 0, 0).unwrap();
        let window = PickupWindow::at(after);
        assert_eq!(window.start, "2025-03-11 12:00:00");
        assert_eq!(window.end, "2025-03-11 17:00:00");
    }

    #[test]
    fn test_order_detail_carries_shipper_and_receiver_fields() {
        let request = ShipmentRequest {
            orderid: "ORDER-1".into(),
            receiver_name: "Ayu".into(),
            receiver_phone: "+62812348888".into(),
            receiver_addr: "Jl. Penerima No.1".into(),
            receiver_zip: "40123".into(),
            destination_code: "JKT".into(),
            receiver_area: "JKT002".into(),
            item_name: "kalung".into(),
            cod: "0".into(),
            goodsvalue: "220000".into(),
        };
        let shipper = ShipperProfile::default();
        let detail = OrderDetail {
            username: "u",
            api_key: "k",
            shipper_name: &shipper.name,
            shipper_contact: &shipper.contact,
            shipper_phone: &shipper.phone,
            shipper_addr: &shipper.address,
            origin_code: &shipper.origin_code,
            qty: "1",
            weight: "1",
            goodsdesc: "x",
            servicetype: "1",
            insurance: "250",
            orderdate: "d".into(),
            sendstarttime: "s".into(),
            sendendtime: "e".into(),
            expresstype: "EZ",
            request: &request,
        };
        let value = serde_json::to_value(Wrapper { detail: [detail] }).unwrap();
        assert_eq!(value["detail"][0]["origin_code"], "BKI");
        assert_eq!(value["detail"][0]["receiver_area"], "JKT002");
        assert_eq!(value["detail"][0]["expresstype"], "EZ");
    }

    #[tokio::test]
    async fn test_track_posts_awb_with_basic_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/jandt_track/track/trackAction!tracking.action"))
            .and(header_exists("authorization"))
            .and(body_json(json!({"awb": "JX0042", "eccompanyid": "SPARKLORE"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "awb": "JX0042",
                "history": [{"status": "Manifes - diterima gudang"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = JntClient::new(settings(&server.uri())).unwrap();
        let response = client.track("JX0042").await.unwrap();
        assert_eq!(response.latest_status(), Some("Manifes - diterima gudang"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = JntClient::new(settings(&server.uri())).unwrap();
        let err = client.track("JX0042").await.unwrap_err();
        assert_eq!(
            err,
            CarrierError::Status {
                status: 503,
                body: "maintenance".into()
            }
        );
    }

    #[tokio::test]
    async fn test_waybill_posts_signed_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/jandt_order_web/labels/labelsAction!getPrintUrl.action"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"url": "https://print"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = JntClient::new(settings(&server.uri())).unwrap();
        let response = client.print_waybill("JX0042").await.unwrap();
        assert_eq!(response["url"], "https://print");

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8(requests[0].body.clone()).unwrap();
        assert!(body.contains("msg_type=ROTAPRINT"));
        assert!(body.contains("data_digest="));
    }

    #[tokio::test]
    async fn test_cancel_order_posts_signed_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/jts-idn-ecommerce-api/api/order/cancel"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = JntClient::new(settings(&server.uri())).unwrap();
        let response = client.cancel_order("ORDER-1", "customer request").await.unwrap();
        assert_eq!(response["success"], true);

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8(requests[0].body.clone()).unwrap();
        assert!(body.starts_with("data_param="));
        assert!(body.contains("&data_sign="));
    }
}
