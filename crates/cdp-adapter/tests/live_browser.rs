//! Live browser checks for the CDP document port.
//!
//! Needs a Chromium started with `--remote-debugging-port=9222` and at least
//! one open tab. Run with:
//! ```bash
//! export ALPHALOOP_CDP_URL=http://127.0.0.1:9222
//! cargo test -p cdp-adapter --test live_browser -- --nocapture
//! ```

use std::env;

use action_primitives::{locate, DocumentPort};
use alphaloop_core_types::{CoreError, StructuralPredicate};
use cdp_adapter::{CdpConfig, CdpDocument};

fn live_config() -> Option<CdpConfig> {
    let url = env::var("ALPHALOOP_CDP_URL").ok()?;
    Some(CdpConfig {
        debugger_url: url,
        ..CdpConfig::default()
    })
}

#[tokio::test]
async fn body_resolves_and_attributes_round_trip() {
    let Some(config) = live_config() else {
        println!("Skipping live browser test (ALPHALOOP_CDP_URL not set)");
        return;
    };

    let doc = CdpDocument::connect(&config).await.expect("attach to browser");
    let body = locate(&doc, &StructuralPredicate::tag("body"), None)
        .await
        .unwrap()
        .expect("page has a body");

    doc.set_attribute(&body, "data-alphaloop-probe", "1")
        .await
        .unwrap();
    assert_eq!(
        doc.attribute(&body, "data-alphaloop-probe").await.unwrap(),
        Some("1".to_string())
    );
    let rect = doc.bounding_box(&body).await.unwrap();
    assert!(rect.width >= 0.0);
}

#[tokio::test]
async fn requery_invalidates_previous_handles() {
    let Some(config) = live_config() else {
        println!("Skipping live browser test (ALPHALOOP_CDP_URL not set)");
        return;
    };

    let doc = CdpDocument::connect(&config).await.expect("attach to browser");
    let body = StructuralPredicate::tag("body");
    let first = doc.query(&body).await.unwrap().remove(0);
    let second = doc.query(&body).await.unwrap().remove(0);

    assert_ne!(first, second);
    let err = doc.text_content(&first).await.unwrap_err();
    assert!(matches!(err, CoreError::StaleHandle { .. }));
    assert!(doc.text_content(&second).await.is_ok());
}
