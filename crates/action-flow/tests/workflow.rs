mod common;

use action_flow::{
    AttemptReport, ConfirmPoint, FlowError, Side, StepName, TradeWorkflow, WORKFLOW,
};
use action_primitives::testkit::{PortFault, RecordingPacer};
use action_primitives::PrimitiveFailure;
use alphaloop_core_types::{EventKind, GateState};
use common::{config, instant_config, trading_panel, Layout};

const CLICK: [EventKind; 3] = [EventKind::MouseDown, EventKind::Click, EventKind::MouseUp];

#[tokio::test]
async fn full_workflow_runs_every_step_in_order() {
    let panel = trading_panel(Layout::default());
    let config = config(1);
    let pacer = RecordingPacer::new();
    let mut report = AttemptReport::new(1);

    TradeWorkflow::new(&panel.doc, &pacer, &config)
        .execute(&mut report)
        .await
        .unwrap();

    assert_eq!(report.steps(), WORKFLOW.to_vec());
    assert!(report.outcomes.iter().all(|o| o.success));

    assert_eq!(panel.doc.value_of(panel.amount), "8");
    assert_eq!(panel.doc.value_of(panel.slider.unwrap()), "100");
    assert_eq!(panel.doc.value_of(panel.slippage_field), "0.1");
    assert_eq!(panel.doc.dispatched(panel.buy_button), CLICK.to_vec());
    assert_eq!(panel.doc.dispatched(panel.sell_button), CLICK.to_vec());
    // Two slippage confirms plus buy and sell order confirms.
    assert_eq!(panel.doc.dispatched(panel.confirm.unwrap()).len(), 4 * 3);
    assert_eq!(panel.doc.dispatched(panel.settings).len(), 2 * 3);

    let pauses = pacer.pauses();
    assert_eq!(pauses.first(), Some(&config.pacing.step));
    assert_eq!(pauses.get(1), Some(&config.pacing.amount_settle));
    assert_eq!(pauses.last(), Some(&config.pacing.final_settle));
}

#[tokio::test]
async fn failed_amount_write_aborts_before_click_buy() {
    let panel = trading_panel(Layout::default());
    panel.doc.set_base_setter(panel.amount, false);
    let config = instant_config(1);
    let pacer = RecordingPacer::new();
    let mut report = AttemptReport::new(1);

    let fault = TradeWorkflow::new(&panel.doc, &pacer, &config)
        .execute(&mut report)
        .await
        .unwrap_err();

    assert!(matches!(
        fault,
        FlowError::StepFault {
            step: StepName::EnterBuyAmount,
            cause: PrimitiveFailure::InjectorUnavailable(_),
        }
    ));
    assert_eq!(
        report.steps(),
        vec![StepName::SelectBuyTab, StepName::EnterBuyAmount]
    );
    assert!(!report.outcome(StepName::EnterBuyAmount).unwrap().success);
    assert!(panel.doc.dispatched(panel.buy_button).is_empty());
    assert!(panel.doc.dispatched(panel.sell_button).is_empty());
}

#[tokio::test]
async fn missing_custom_option_is_tolerated() {
    let panel = trading_panel(Layout {
        custom_option: false,
        ..Layout::default()
    });
    let config = instant_config(1);
    let pacer = RecordingPacer::new();
    let mut report = AttemptReport::new(1);

    TradeWorkflow::new(&panel.doc, &pacer, &config)
        .execute(&mut report)
        .await
        .unwrap();

    for side in [Side::Buy, Side::Sell] {
        let outcome = report.outcome(StepName::ConfigureSlippage(side)).unwrap();
        assert!(outcome.success);
        assert!(outcome.detail.as_deref().unwrap().contains("自定义"));
    }
    assert_eq!(panel.doc.value_of(panel.slippage_field), "");
    assert_eq!(panel.doc.dispatched(panel.sell_button), CLICK.to_vec());
}

#[tokio::test]
async fn missing_buy_tab_faults_first_step() {
    let panel = trading_panel(Layout {
        buy_tab: false,
        ..Layout::default()
    });
    let config = instant_config(1);
    let pacer = RecordingPacer::new();
    let mut report = AttemptReport::new(1);

    let fault = TradeWorkflow::new(&panel.doc, &pacer, &config)
        .execute(&mut report)
        .await
        .unwrap_err();

    assert_eq!(fault.step(), Some(StepName::SelectBuyTab));
    assert!(matches!(
        fault,
        FlowError::StepFault {
            cause: PrimitiveFailure::LocateAbsent(_),
            ..
        }
    ));
    assert_eq!(panel.doc.dispatch_count(), 0);
    assert!(pacer.pauses().is_empty());
}

#[tokio::test]
async fn disabled_buy_button_faults_click_buy() {
    let panel = trading_panel(Layout::default());
    panel.doc.set_node_gate(
        panel.buy_button,
        GateState {
            disabled: true,
            read_only: false,
        },
    );
    let config = instant_config(1);
    let pacer = RecordingPacer::new();
    let mut report = AttemptReport::new(1);

    let fault = TradeWorkflow::new(&panel.doc, &pacer, &config)
        .execute(&mut report)
        .await
        .unwrap_err();

    assert!(matches!(
        fault,
        FlowError::StepFault {
            step: StepName::ClickBuy,
            cause: PrimitiveFailure::GateBlocked(_),
        }
    ));
    assert_eq!(report.outcomes.len(), 5);
    assert!(report
        .outcome(StepName::Confirm(ConfirmPoint::BuySlippage))
        .unwrap()
        .success);
    assert!(panel.doc.dispatched(panel.buy_button).is_empty());
    assert!(panel.doc.dispatched(panel.sell_tab).is_empty());
}

#[tokio::test]
async fn missing_slider_faults_sell_leg() {
    let panel = trading_panel(Layout {
        range_control: false,
        ..Layout::default()
    });
    let config = instant_config(1);
    let pacer = RecordingPacer::new();
    let mut report = AttemptReport::new(1);

    let fault = TradeWorkflow::new(&panel.doc, &pacer, &config)
        .execute(&mut report)
        .await
        .unwrap_err();

    assert_eq!(fault.step(), Some(StepName::SetSellToFull));
    assert_eq!(panel.doc.dispatched(panel.buy_button), CLICK.to_vec());
    assert!(panel.doc.dispatched(panel.sell_button).is_empty());
}

#[tokio::test]
async fn slippage_panel_paces_after_each_of_its_four_actions() {
    let panel = trading_panel(Layout::default());
    let config = config(1);
    let pacer = RecordingPacer::new();
    let mut report = AttemptReport::new(1);

    TradeWorkflow::new(&panel.doc, &pacer, &config)
        .execute(&mut report)
        .await
        .unwrap();

    let pauses = pacer.pauses();
    // Ten single-pause steps plus two four-pause slippage steps.
    assert_eq!(pauses.len(), 18);
    assert_eq!(pauses[2..6], [config.pacing.step; 4]);
    assert_eq!(pauses[6], config.pacing.order_settle);
}

#[tokio::test]
async fn document_channel_error_becomes_step_fault() {
    let panel = trading_panel(Layout::default());
    panel.doc.fail_on(PortFault::Dispatch);
    let config = instant_config(1);
    let pacer = RecordingPacer::new();
    let mut report = AttemptReport::new(1);

    let fault = TradeWorkflow::new(&panel.doc, &pacer, &config)
        .execute(&mut report)
        .await
        .unwrap_err();

    assert!(matches!(
        fault,
        FlowError::StepFault {
            step: StepName::SelectBuyTab,
            cause: PrimitiveFailure::Port(_),
        }
    ));
    assert_eq!(report.steps(), vec![StepName::SelectBuyTab]);
    assert!(pacer.pauses().is_empty());
}
