use dermascan_core::models::response::{AnalysisResponse, Citation};
use dermascan_export::error::ExportError;
use dermascan_export::share::{
    decode_response, encode_response, response_from_url, share_param, share_url,
};
use proptest::prelude::*;

fn sample() -> AnalysisResponse {
    AnalysisResponse::new(
        "~ABCDE_START~\nConfidence Score: 82%\nA: Suspicious - uneven halves\n~ABCDE_END~\n## Report\nSee a dermatologist.",
    )
    .with_citations(vec![Citation {
        uri: "https://www.aad.org/public/diseases/skin-cancer".to_string(),
        title: "AAD".to_string(),
    }])
}

#[test]
fn payload_is_url_safe_and_reversible() {
    let payload = encode_response(&sample()).expect("encode");
    assert!(
        payload
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    );
    assert_eq!(decode_response(&payload).expect("decode"), sample());
}

#[test]
fn share_url_picks_the_right_separator() {
    let response = sample();
    let payload = encode_response(&response).expect("encode");

    assert_eq!(
        share_url("https://dermascan.app/", &response).expect("url"),
        format!("https://dermascan.app/?share={payload}")
    );
    assert_eq!(
        share_url("https://dermascan.app/?lang=en", &response).expect("url"),
        format!("https://dermascan.app/?lang=en&share={payload}")
    );
    assert_eq!(
        share_url("https://dermascan.app/view#result", &response).expect("url"),
        format!("https://dermascan.app/view?share={payload}#result")
    );
}

#[test]
fn response_is_recovered_from_a_full_link() {
    let url = share_url("https://dermascan.app/?lang=en", &sample()).expect("url");
    assert_eq!(response_from_url(&url).expect("decode"), sample());
}

#[test]
fn missing_or_damaged_payloads_are_rejected() {
    assert_eq!(share_param("https://dermascan.app/?lang=en"), None);
    assert_eq!(share_param("https://dermascan.app/?share="), None);

    assert!(matches!(
        response_from_url("https://dermascan.app/"),
        Err(ExportError::InvalidShareLink(_))
    ));
    assert!(matches!(
        decode_response("not*base64"),
        Err(ExportError::InvalidShareLink(_))
    ));
    assert!(matches!(
        decode_response("AAAA"),
        Err(ExportError::InvalidShareLink(_))
    ));
}

proptest! {
    #[test]
    fn any_response_survives_a_share_link(
        text in ".{0,400}",
        links in proptest::collection::vec(("[a-z]{1,12}", "[a-zA-Z ]{1,20}"), 0..4),
    ) {
        let response = AnalysisResponse::new(text).with_citations(
            links
                .into_iter()
                .map(|(host, title)| Citation { uri: format!("https://{host}.org"), title })
                .collect(),
        );
        let url = share_url("https://dermascan.app/", &response).expect("url");
        prop_assert_eq!(response_from_url(&url).expect("decode"), response);
    }
}
