//! Lookup form submission and acknowledgment validation.

use crate::error::{PortalError, Result};
use crate::session::Session;
use ktpn_core::{LookupRequest, PortalConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pause between fetching the CAPTCHA and submitting the form.
///
/// Fixed courtesy delay towards the portal. Not configurable.
pub const SUBMIT_DELAY: Duration = Duration::from_secs(3);

/// Acknowledgment envelope returned by the submission endpoint.
///
/// `success` is a string on the wire; only the exact value `"true"` counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionAck {
    /// `"true"` when the lookup was accepted
    #[serde(default)]
    pub success: String,
    /// Location of the result page
    #[serde(default)]
    pub href: String,
}

impl SubmissionAck {
    /// Check whether the portal accepted the lookup.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.success == "true"
    }

    /// Decode and validate a raw acknowledgment body.
    ///
    /// # Errors
    /// - [`PortalError::Decode`] if the body is not the expected JSON object
    /// - [`PortalError::SubmissionRejected`] if `success` is anything but `"true"`
    pub fn from_body(body: &[u8]) -> Result<Self> {
        let ack: Self = serde_json::from_slice(body).map_err(|e| {
            PortalError::decode(
                "acknowledgment",
                format!("{e}: {}", String::from_utf8_lossy(body)),
            )
        })?;

        if !ack.is_accepted() {
            return Err(PortalError::SubmissionRejected {
                body: String::from_utf8_lossy(body).into_owned(),
            });
        }
        Ok(ack)
    }
}

/// Submits lookup forms to the portal.
pub struct LookupSubmitter<'a> {
    portal: &'a PortalConfig,
}

impl<'a> LookupSubmitter<'a> {
    /// Create a submitter for the configured portal.
    #[must_use]
    pub fn new(portal: &'a PortalConfig) -> Self {
        Self { portal }
    }

    /// Build the URL-encoded form fields for a lookup.
    ///
    /// Field names are the portal's own: `BienKS` (plate), `Xe` (vehicle
    /// code), `captcha`, `ipClient` and `cUrl`.
    #[must_use]
    pub fn form_fields(
        &self,
        request: &LookupRequest,
        captcha: &str,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("BienKS", request.plate.as_str().to_string()),
            ("Xe", request.vehicle_type.code().to_string()),
            ("captcha", captcha.to_string()),
            ("ipClient", self.portal.client_ip.clone()),
            ("cUrl", self.portal.submit_flag.clone()),
        ]
    }

    /// Wait out [`SUBMIT_DELAY`], submit the form and validate the acknowledgment.
    ///
    /// The returned acknowledgment's `href` is not followed here.
    pub async fn submit(
        &self,
        session: &Session,
        request: &LookupRequest,
        captcha: &str,
    ) -> Result<SubmissionAck> {
        let fields = self.form_fields(request, captcha);
        let fields: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();

        tokio::time::sleep(SUBMIT_DELAY).await;

        let body = session.post_form(&self.portal.submit_url, &fields).await?;
        let ack = SubmissionAck::from_body(&body)?;
        tracing::debug!("Lookup accepted for {}, result at {}", request.plate, ack.href);
        Ok(ack)
    }

    /// Resolve the acknowledgment's `href` against the submission URL.
    ///
    /// Absolute links are returned unchanged.
    pub fn result_url(&self, ack: &SubmissionAck) -> Result<reqwest::Url> {
        if ack.href.trim().is_empty() {
            return Err(PortalError::decode(
                "acknowledgment",
                "accepted lookup without a result href",
            ));
        }

        let base = reqwest::Url::parse(&self.portal.submit_url)
            .map_err(|e| PortalError::decode("submission URL", e.to_string()))?;
        base.join(ack.href.trim())
            .map_err(|e| PortalError::decode("result href", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ktpn_core::VehicleType;

    #[test]
    fn test_form_fields() {
        let portal = PortalConfig::default();
        let submitter = LookupSubmitter::new(&portal);
        let request = LookupRequest::new("29a-123.45", VehicleType::Car);

        let fields = submitter.form_fields(&request, "x7k2p");

        assert_eq!(
            fields,
            vec![
                ("BienKS", "29A12345".to_string()),
                ("Xe", "1".to_string()),
                ("captcha", "x7k2p".to_string()),
                ("ipClient", "9.9.9.91".to_string()),
                ("cUrl", "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_accepted_ack() {
        let ack = SubmissionAck::from_body(
            br#"{"success":"true","href":"https://www.csgt.vn/tra-cuu?id=1"}"#,
        )
        .expect("accepted ack");
        assert!(ack.is_accepted());
        assert_eq!(ack.href, "https://www.csgt.vn/tra-cuu?id=1");
    }

    #[test]
    fn test_rejected_ack() {
        let err = SubmissionAck::from_body(br#"{"success":"false","href":""}"#)
            .expect_err("rejected ack");
        assert!(matches!(err, PortalError::SubmissionRejected { .. }));
    }

    #[test]
    fn test_only_exact_true_is_accepted() {
        for body in [
            &br#"{"success":"TRUE","href":"/r"}"#[..],
            br#"{"success":"1","href":"/r"}"#,
            br#"{"href":"/r"}"#,
        ] {
            let err = SubmissionAck::from_body(body).expect_err("not accepted");
            assert!(matches!(err, PortalError::SubmissionRejected { .. }));
        }
    }

    #[test]
    fn test_malformed_ack() {
        let err = SubmissionAck::from_body(b"<html>Sai ma bao mat</html>").expect_err("not json");
        assert!(matches!(err, PortalError::Decode { .. }));

        // boolean instead of the string the portal sends
        let err = SubmissionAck::from_body(br#"{"success":true,"href":"/r"}"#)
            .expect_err("wrong shape");
        assert!(matches!(err, PortalError::Decode { .. }));
    }

    #[test]
    fn test_result_url_resolution() {
        let portal = PortalConfig::default();
        let submitter = LookupSubmitter::new(&portal);

        let absolute = SubmissionAck {
            success: "true".to_string(),
            href: "https://www.csgt.vn/tra-cuu-phuong-tien-vi-pham.html?&LoaiXe=1".to_string(),
        };
        assert_eq!(
            submitter.result_url(&absolute).expect("absolute").as_str(),
            "https://www.csgt.vn/tra-cuu-phuong-tien-vi-pham.html?&LoaiXe=1"
        );

        let relative = SubmissionAck {
            success: "true".to_string(),
            href: "/ket-qua?id=42".to_string(),
        };
        assert_eq!(
            submitter.result_url(&relative).expect("relative").as_str(),
            "https://www.csgt.vn/ket-qua?id=42"
        );

        let empty = SubmissionAck {
            success: "true".to_string(),
            href: String::new(),
        };
        assert!(matches!(
            submitter.result_url(&empty),
            Err(PortalError::Decode { .. })
        ));
    }

    #[test]
    fn test_submit_delay_is_three_seconds() {
        assert_eq!(SUBMIT_DELAY, Duration::from_secs(3));
    }
}
