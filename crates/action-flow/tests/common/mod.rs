//! In-memory trading panel matching the default selectors.
#![allow(dead_code)]

use action_flow::{FlowConfig, PacingConfig};
use action_primitives::testkit::{MemoryDocument, MemoryNode, NodeId};

/// Which parts of the panel to render.
pub struct Layout {
    pub modal: bool,
    pub buy_tab: bool,
    pub custom_option: bool,
    pub range_control: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            modal: true,
            buy_tab: true,
            custom_option: true,
            range_control: true,
        }
    }
}

pub struct Panel {
    pub doc: MemoryDocument,
    pub buy_tab: Option<NodeId>,
    pub sell_tab: NodeId,
    pub amount: NodeId,
    pub slider: Option<NodeId>,
    pub confirm: Option<NodeId>,
    pub cancel: Option<NodeId>,
    pub settings: NodeId,
    pub custom_option: Option<NodeId>,
    pub slippage_field: NodeId,
    pub buy_button: NodeId,
    pub sell_button: NodeId,
}

pub fn trading_panel(layout: Layout) -> Panel {
    let doc = MemoryDocument::new();

    let tab = |id: &str, text: &str| {
        MemoryNode::new("div")
            .role("tab")
            .id(id)
            .class("bn-tab")
            .class("bn-tab__buySell")
            .text(text)
    };
    let buy_tab = layout.buy_tab.then(|| doc.insert(tab("bn-tab-0", "买入")));
    let sell_tab = doc.insert(tab("bn-tab-1", "卖出"));

    let amount = doc.insert(MemoryNode::new("input").id("fromCoinAmount").value("0"));
    let slider = layout
        .range_control
        .then(|| doc.insert(MemoryNode::new("input").role("slider").value("0")));

    let header = doc.insert(
        MemoryNode::new("div")
            .class("t-subtitle3")
            .class("text-PrimaryText"),
    );
    let settings = doc.insert(
        MemoryNode::new("div")
            .class("bn-flex")
            .class("cursor-pointer")
            .parent(header),
    );
    let option = |text: &str| {
        MemoryNode::new("div")
            .class("t-subtitle1")
            .class("text-PrimaryText")
            .text(text)
    };
    doc.insert(option("0.5%"));
    let custom_option = layout.custom_option.then(|| doc.insert(option(" 自定义 ")));
    let slippage_field = doc.insert(MemoryNode::new("input").id("customize-slippage"));

    let buy_button = doc.insert(
        MemoryNode::new("button")
            .class("bn-button")
            .class("bn-button__buy")
            .text("买入"),
    );
    let sell_button = doc.insert(
        MemoryNode::new("button")
            .class("bn-button")
            .class("bn-button__sell")
            .text("卖出"),
    );

    let (confirm, cancel) = if layout.modal {
        let footer = doc.insert(MemoryNode::new("div").class("bn-modal-footer"));
        let cancel = doc.insert(MemoryNode::new("button").class("bn-button").parent(footer));
        let confirm = doc.insert(
            MemoryNode::new("button")
                .class("bn-button")
                .class("bn-button__primary")
                .parent(footer),
        );
        (Some(confirm), Some(cancel))
    } else {
        (None, None)
    };

    Panel {
        doc,
        buy_tab,
        sell_tab,
        amount,
        slider,
        confirm,
        cancel,
        settings,
        custom_option,
        slippage_field,
        buy_button,
        sell_button,
    }
}

pub fn config(iterations: u32) -> FlowConfig {
    let mut config = FlowConfig::default();
    config.trade.iterations = iterations;
    config
}

/// Default trade values with zero-length pacing.
pub fn instant_config(iterations: u32) -> FlowConfig {
    let mut config = config(iterations);
    config.pacing = PacingConfig::instant();
    config
}
