//! Thin asynchronous client for the shop backend.
//!
//! - `GET main/items` returns the item catalog.
//! - `GET main/packages` returns the active packages plus a last-updated stamp.
//!
//! Payloads are validated row by row; malformed rows are dropped with a warning
//! instead of failing the whole fetch.

use std::time::{Duration, SystemTime};

use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::domain::{Catalog, Item, Package, PackageItem, PackageKey, PackageList};
use crate::util::version::{version_label, APP_NAME};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ShopClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server responded with {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("{message}")]
    Business { code: String, message: String },
    #[error("unexpected payload: {0}")]
    Payload(String),
}

/// Human-readable text for the backend's business error codes.
pub fn error_code_message(code: &str) -> Option<&'static str> {
    let message = match code {
        "VALIDATION_ERROR" => "The submitted data is not valid.",
        "ANALYTICS_ERROR" => "Analytics data could not be processed.",
        "SAME_ROLE_ERROR" => "The role is already assigned.",
        "PENDING_ADMIN_NOT_FOUND" => "No pending admin request was found.",
        "INVALID_SORT_FIELD" => "Invalid sort field.",
        "PAGE_OUT_OF_RANGE" => "The requested page is out of range.",
        "ADMIN_NOT_FOUND" => "Admin not found.",
        "INVALID_ADMIN_ROLE" => "Invalid admin role.",
        "ADMIN_STATUS_INVALID" => "Admin status is not valid.",
        "ALREADY_EXISTING_ITEM" => "The item already exists.",
        "INVALID_FILE" => "The file is not valid.",
        "IMAGE_UPLOAD_ERROR" => "Uploading the image failed.",
        "IMAGE_DELETE_ERROR" => "Deleting the image failed.",
        "INVALID_STATUS" => "Invalid status.",
        "ITEM_NOT_FOUND" => "Item not found.",
        "PACKAGE_NOT_FOUND" => "Package not found.",
        _ => return None,
    };
    Some(message)
}

#[derive(Clone, Debug)]
pub struct Fetched<T> {
    pub data: T,
    pub fetched_at: SystemTime,
}

#[derive(Clone)]
pub struct ShopClient {
    http: Client,
    base_url: Url,
}

impl ShopClient {
    pub fn with_base_url(base: &str) -> Result<Self, ShopClientError> {
        let base_url = normalize_base(base)?;
        let user_agent = format!("{}/{}", APP_NAME.replace(' ', "-"), version_label());
        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn get_items(&self) -> Result<Fetched<Catalog>, ShopClientError> {
        let url = self.url("main/items")?;
        let raw = self.fetch_json(url).await?;
        let catalog = parse_items(raw)?;
        tracing::info!(items = catalog.len(), "loaded item catalog");
        Ok(Fetched {
            data: catalog,
            fetched_at: SystemTime::now(),
        })
    }

    pub async fn get_packages(&self) -> Result<Fetched<PackageList>, ShopClientError> {
        let url = self.url("main/packages")?;
        let raw = self.fetch_json(url).await?;
        let list = parse_packages(raw)?;
        tracing::info!(packages = list.packages.len(), "loaded package list");
        Ok(Fetched {
            data: list,
            fetched_at: SystemTime::now(),
        })
    }

    async fn fetch_json(&self, url: Url) -> Result<Value, ShopClientError> {
        tracing::debug!(%url, "requesting shop data");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        interpret_response(status, &body)
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

fn normalize_base(base: &str) -> Result<Url, url::ParseError> {
    // `Url::join` drops the last segment unless the base ends with a slash.
    if base.ends_with('/') {
        Url::parse(base)
    } else {
        Url::parse(&format!("{base}/"))
    }
}

/// Business errors arrive either with HTTP 200 or with an error status; both
/// carry `errorCode` (or `code`) and `message`.
fn interpret_response(status: StatusCode, body: &str) -> Result<Value, ShopClientError> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    if let Some(error) = parsed.as_ref().and_then(business_error) {
        return Err(error);
    }

    if !status.is_success() {
        let message = parsed
            .as_ref()
            .and_then(|value| value.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| match status {
                StatusCode::FORBIDDEN => "access denied".to_string(),
                _ => status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            });
        return Err(ShopClientError::Status { status, message });
    }

    parsed.ok_or_else(|| ShopClientError::Payload("response body is not JSON".into()))
}

fn business_error(value: &Value) -> Option<ShopClientError> {
    let object = value.as_object()?;
    let code = object
        .get("errorCode")
        .or_else(|| object.get("code"))
        .and_then(Value::as_str)?;
    let server_message = object.get("message").and_then(Value::as_str);
    if let Some(detail) = server_message {
        tracing::warn!(code, "shop backend error: {detail}");
    }
    let message = error_code_message(code)
        .map(str::to_string)
        .or_else(|| server_message.map(str::to_string))
        .unwrap_or_else(|| "Unknown error.".to_string());
    Some(ShopClientError::Business {
        code: code.to_string(),
        message,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemDto {
    item_id: u64,
    item_name: String,
    ruby: f64,
    #[serde(alias = "img", default)]
    img_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageItemDto {
    item_id: u64,
    #[serde(default)]
    item_name: Option<String>,
    #[serde(alias = "img", default)]
    img_url: Option<String>,
    quantity: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageDto {
    package_id: u64,
    package_name: String,
    package_price: f64,
    #[serde(default)]
    items: Vec<Value>,
}

pub fn parse_items(raw: Value) -> Result<Catalog, ShopClientError> {
    let Value::Array(rows) = raw else {
        return Err(ShopClientError::Payload("item list is not an array".into()));
    };

    let items = rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<ItemDto>(row) {
            Ok(dto) => item_from_dto(dto),
            Err(err) => {
                tracing::warn!("skipping malformed item row: {err}");
                None
            }
        })
        .collect();
    Ok(Catalog::new(items))
}

fn item_from_dto(dto: ItemDto) -> Option<Item> {
    let Some(ruby) = whole_ruby(dto.ruby) else {
        tracing::warn!(item_id = dto.item_id, ruby = dto.ruby, "skipping item with invalid ruby value");
        return None;
    };
    Some(Item {
        id: dto.item_id,
        name: dto.item_name,
        ruby,
        img_url: dto.img_url.unwrap_or_default(),
    })
}

fn whole_ruby(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64)
        .then_some(value as u64)
}

pub fn parse_packages(raw: Value) -> Result<PackageList, ShopClientError> {
    let Value::Object(mut object) = raw else {
        return Err(ShopClientError::Payload("package list is not an object".into()));
    };

    let last_updated_at = object
        .get("lastUpdatedAt")
        .and_then(Value::as_str)
        .and_then(parse_timestamp);

    let rows = match object.remove("packages") {
        Some(Value::Array(rows)) => rows,
        Some(Value::Null) | None => Vec::new(),
        Some(_) => {
            return Err(ShopClientError::Payload("packages is not an array".into()));
        }
    };

    let packages = rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<PackageDto>(row) {
            Ok(dto) => package_from_dto(dto),
            Err(err) => {
                tracing::warn!("skipping malformed package row: {err}");
                None
            }
        })
        .collect();

    Ok(PackageList {
        last_updated_at,
        packages,
    })
}

fn package_from_dto(dto: PackageDto) -> Option<Package> {
    if !dto.package_price.is_finite() || dto.package_price < 0.0 {
        tracing::warn!(
            package_id = dto.package_id,
            price = dto.package_price,
            "skipping package with invalid price"
        );
        return None;
    }

    let package_id = dto.package_id;
    let items = dto
        .items
        .into_iter()
        .filter_map(|row| {
            let line = serde_json::from_value::<PackageItemDto>(row)
                .map_err(|err| tracing::warn!(package_id, "skipping malformed package item: {err}"))
                .ok()?;
            let quantity = u32::try_from(line.quantity).ok().filter(|qty| *qty > 0);
            let Some(quantity) = quantity else {
                tracing::warn!(
                    package_id,
                    item_id = line.item_id,
                    quantity = line.quantity,
                    "skipping package item with non-positive quantity"
                );
                return None;
            };
            Some(PackageItem {
                item_id: line.item_id,
                item_name: line.item_name.unwrap_or_default(),
                img_url: line.img_url.unwrap_or_default(),
                quantity,
            })
        })
        .collect();

    Some(Package {
        key: PackageKey::Server(package_id),
        name: dto.package_name,
        price: dto.package_price,
        items,
    })
}

/// Accepts RFC 3339 or the backend's offset-less `LocalDateTime` form (read as UTC).
fn parse_timestamp(value: &str) -> Option<OffsetDateTime> {
    if let Ok(parsed) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(parsed);
    }
    let trimmed = value.split('.').next().unwrap_or(value);
    let local = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    PrimitiveDateTime::parse(trimmed, &local)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|err| tracing::debug!("unparseable lastUpdatedAt {value:?}: {err}"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn items_accept_either_image_field() {
        let catalog = parse_items(json!([
            {"itemId": 1, "itemName": "Gem", "ruby": 100, "imgUrl": "a.png"},
            {"itemId": 2, "itemName": "Potion", "ruby": 50.0, "img": "b.png"}
        ]))
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).unwrap().img_url, "a.png");
        assert_eq!(catalog.get(2).unwrap().img_url, "b.png");
        assert_eq!(catalog.get(2).unwrap().ruby, 50);
    }

    #[test]
    fn invalid_item_rows_are_dropped() {
        let catalog = parse_items(json!([
            {"itemId": 1, "itemName": "Gem", "ruby": -4},
            {"itemId": 2, "itemName": "Shard", "ruby": 2.5},
            {"itemName": "No id", "ruby": 3},
            {"itemId": 4, "itemName": "Ok", "ruby": 0}
        ]))
        .unwrap();
        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn items_must_be_an_array() {
        assert!(matches!(
            parse_items(json!({"items": []})),
            Err(ShopClientError::Payload(_))
        ));
    }

    #[test]
    fn packages_are_validated() {
        let list = parse_packages(json!({
            "lastUpdatedAt": "2025-03-01T12:30:00",
            "packages": [
                {
                    "packageId": 7,
                    "packageName": "Starter",
                    "packagePrice": 900.0,
                    "totalRuby": 400.0,
                    "items": [
                        {"itemId": 1, "itemName": "Gem", "ruby": 100.0, "imgUrl": "", "quantity": 2},
                        {"itemId": 2, "itemName": "Potion", "ruby": 50.0, "quantity": 0},
                        {"itemId": 3, "quantity": 4}
                    ]
                },
                {"packageId": 8, "packageName": "Broken", "packagePrice": -1.0, "items": []},
                {"packageName": "No id", "packagePrice": 1.0}
            ]
        }))
        .unwrap();

        assert_eq!(list.packages.len(), 1);
        let package = &list.packages[0];
        assert_eq!(package.key, PackageKey::Server(7));
        assert_eq!(
            package.items.iter().map(|i| (i.item_id, i.quantity)).collect::<Vec<_>>(),
            vec![(1, 2), (3, 4)]
        );
        let stamp = list.last_updated_at.unwrap();
        assert_eq!((stamp.hour(), stamp.minute()), (12, 30));
    }

    #[test]
    fn rfc3339_timestamps_parse() {
        let stamp = parse_timestamp("2025-03-01T12:30:00+09:00").unwrap();
        assert_eq!(stamp.offset().whole_hours(), 9);
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn business_error_with_ok_status() {
        let err = interpret_response(
            StatusCode::OK,
            r#"{"status":200,"errorCode":"PACKAGE_NOT_FOUND","message":"no package 3"}"#,
        )
        .unwrap_err();
        match err {
            ShopClientError::Business { code, message } => {
                assert_eq!(code, "PACKAGE_NOT_FOUND");
                assert_eq!(message, "Package not found.");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unknown_code_falls_back_to_server_message() {
        let err = interpret_response(
            StatusCode::BAD_REQUEST,
            r#"{"code":"SOMETHING_NEW","message":"try later"}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "try later");
    }

    #[test]
    fn plain_http_failures_keep_status() {
        let err = interpret_response(StatusCode::FORBIDDEN, "").unwrap_err();
        assert!(matches!(
            err,
            ShopClientError::Status { status: StatusCode::FORBIDDEN, .. }
        ));
        let value = interpret_response(StatusCode::OK, "[]").unwrap();
        assert_eq!(value, json!([]));
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = ShopClient::with_base_url("http://localhost:8080/api").unwrap();
        assert_eq!(
            client.url("main/items").unwrap().as_str(),
            "http://localhost:8080/api/main/items"
        );
    }
}
