mod common;

use action_flow::{FlowError, PanelReset};
use action_primitives::testkit::RecordingPacer;
use alphaloop_core_types::{EventKind, GateState};
use common::{config, trading_panel, Layout};

const CLICK: [EventKind; 3] = [EventKind::MouseDown, EventKind::Click, EventKind::MouseUp];

#[tokio::test]
async fn no_modal_skips_cancel_but_reselects_buy_tab() {
    let panel = trading_panel(Layout {
        modal: false,
        ..Layout::default()
    });
    let config = config(1);
    let pacer = RecordingPacer::new();

    PanelReset::new(&panel.doc, &pacer, &config).run().await.unwrap();

    assert_eq!(panel.doc.dispatched(panel.buy_tab.unwrap()), CLICK.to_vec());
    assert_eq!(panel.doc.dispatch_count(), 3);
    assert_eq!(pacer.pauses(), vec![config.pacing.step]);
}

#[tokio::test]
async fn open_modal_is_cancelled_not_confirmed() {
    let panel = trading_panel(Layout::default());
    let config = config(1);
    let pacer = RecordingPacer::new();

    PanelReset::new(&panel.doc, &pacer, &config).run().await.unwrap();

    assert_eq!(panel.doc.dispatched(panel.cancel.unwrap()), CLICK.to_vec());
    assert!(panel.doc.dispatched(panel.confirm.unwrap()).is_empty());
    assert_eq!(panel.doc.dispatched(panel.buy_tab.unwrap()), CLICK.to_vec());
    assert_eq!(pacer.pauses(), vec![config.pacing.modal, config.pacing.step]);
}

#[tokio::test]
async fn gated_cancel_control_does_not_fail_reset() {
    let panel = trading_panel(Layout::default());
    panel.doc.set_node_gate(
        panel.cancel.unwrap(),
        GateState {
            disabled: true,
            read_only: false,
        },
    );
    let config = config(1);
    let pacer = RecordingPacer::new();

    PanelReset::new(&panel.doc, &pacer, &config).run().await.unwrap();
    assert!(panel.doc.dispatched(panel.cancel.unwrap()).is_empty());
    assert_eq!(panel.doc.dispatched(panel.buy_tab.unwrap()), CLICK.to_vec());
}

#[tokio::test]
async fn reset_is_idempotent() {
    let panel = trading_panel(Layout {
        modal: false,
        ..Layout::default()
    });
    let config = config(1);
    let pacer = RecordingPacer::new();
    let reset = PanelReset::new(&panel.doc, &pacer, &config);

    reset.run().await.unwrap();
    panel.doc.rerender();
    reset.run().await.unwrap();

    assert_eq!(panel.doc.dispatched(panel.buy_tab.unwrap()).len(), 6);
}

#[tokio::test]
async fn missing_buy_tab_is_a_reset_fault() {
    let panel = trading_panel(Layout {
        buy_tab: false,
        ..Layout::default()
    });
    let config = config(1);
    let pacer = RecordingPacer::new();

    let fault = PanelReset::new(&panel.doc, &pacer, &config)
        .run()
        .await
        .unwrap_err();
    assert!(matches!(fault, FlowError::ResetFault(ref reason) if reason.starts_with("buy tab")));
}

#[tokio::test]
async fn missing_range_control_is_a_reset_fault() {
    let panel = trading_panel(Layout {
        range_control: false,
        ..Layout::default()
    });
    let config = config(1);
    let pacer = RecordingPacer::new();

    let fault = PanelReset::new(&panel.doc, &pacer, &config)
        .run()
        .await
        .unwrap_err();
    assert!(
        matches!(fault, FlowError::ResetFault(ref reason) if reason.starts_with("range control"))
    );
    assert_eq!(panel.doc.dispatched(panel.buy_tab.unwrap()), CLICK.to_vec());
}
