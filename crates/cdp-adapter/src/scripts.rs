//! Script templates evaluated in the page
//!
//! Every element script resolves its target through the anchor attribute and
//! answers with `{ ok: true, value }` or `{ stale: true }`.

use alphaloop_core_types::{CoreError, ElementHandle, EventKind, GateState, InteractionEvent};
use serde_json::Value;

pub(crate) const ANCHOR_ATTR: &str = "data-alphaloop-anchor";

/// Render `raw` as a JavaScript string literal.
pub(crate) fn js_str(raw: &str) -> String {
    Value::String(raw.to_string()).to_string()
}

/// Tag every match of `css` with a fresh token and return the tokens in
/// document order.
pub(crate) fn query(css: &str, prefix: &str) -> String {
    format!(
        r#"(() => {{
  const attr = {attr};
  const prefix = {prefix};
  return Array.from(document.querySelectorAll({css})).map((el, index) => {{
    const token = prefix + '-' + index;
    el.setAttribute(attr, token);
    return token;
  }});
}})()"#,
        attr = js_str(ANCHOR_ATTR),
        prefix = js_str(prefix),
        css = js_str(css),
    )
}

/// Wrap `body` so it runs with `el` bound to the handle's element.
pub(crate) fn on_element(handle: &ElementHandle, body: &str) -> String {
    let selector = format!("[{}=\"{}\"]", ANCHOR_ATTR, handle.0.replace('"', "\\\""));
    format!(
        r#"(() => {{
  const el = document.querySelector({selector});
  if (!el) return {{ stale: true }};
  {body}
}})()"#,
        selector = js_str(&selector),
        body = body,
    )
}

pub(crate) const TEXT_CONTENT: &str = "return { ok: true, value: el.textContent || '' };";

pub(crate) const GATE: &str =
    "return { ok: true, value: { disabled: !!el.disabled, read_only: !!el.readOnly } };";

pub(crate) const BOUNDING_BOX: &str = r#"const rect = el.getBoundingClientRect();
  return { ok: true, value: { x: rect.left, y: rect.top, width: rect.width, height: rect.height } };"#;

pub(crate) const FOCUS: &str = "el.focus(); return { ok: true, value: null };";

pub(crate) const BLUR: &str = "el.blur(); return { ok: true, value: null };";

pub(crate) const VALUE: &str =
    "return { ok: true, value: el.value === undefined || el.value === null ? '' : String(el.value) };";

pub(crate) fn attribute(name: &str) -> String {
    format!(
        "return {{ ok: true, value: el.getAttribute({}) }};",
        js_str(name)
    )
}

pub(crate) fn set_attribute(name: &str, value: &str) -> String {
    format!(
        "el.setAttribute({}, {}); return {{ ok: true, value: null }};",
        js_str(name),
        js_str(value)
    )
}

pub(crate) fn set_gate(gate: GateState) -> String {
    format!(
        r#"if ('disabled' in el) el.disabled = {disabled};
  if ('readOnly' in el) el.readOnly = {read_only};
  return {{ ok: true, value: null }};"#,
        disabled = gate.disabled,
        read_only = gate.read_only,
    )
}

/// Call the prototype's `value` setter bound to the element, bypassing any
/// setter a framework installed on the instance.
pub(crate) fn write_base_value(value: &str) -> String {
    format!(
        r#"const proto = el instanceof HTMLTextAreaElement
    ? HTMLTextAreaElement.prototype
    : HTMLInputElement.prototype;
  const descriptor = Object.getOwnPropertyDescriptor(proto, 'value');
  if (!descriptor || typeof descriptor.set !== 'function') return {{ ok: true, value: false }};
  try {{
    descriptor.set.call(el, {value});
  }} catch (_) {{
    return {{ ok: true, value: false }};
  }}
  return {{ ok: true, value: true }};"#,
        value = js_str(value),
    )
}

pub(crate) fn dispatch(event: &InteractionEvent) -> String {
    let init = match (event.kind.is_pointer(), event.coordinates) {
        (true, Some((x, y))) => format!(
            "{{ bubbles: {}, cancelable: {}, view: window, clientX: {}, clientY: {} }}",
            event.bubbles, event.cancelable, x, y
        ),
        (true, None) => format!(
            "{{ bubbles: {}, cancelable: {}, view: window }}",
            event.bubbles, event.cancelable
        ),
        (false, _) => format!(
            "{{ bubbles: {}, cancelable: {} }}",
            event.bubbles, event.cancelable
        ),
    };
    let constructor = if event.kind.is_pointer() {
        "MouseEvent"
    } else {
        "Event"
    };
    let pin = match event.kind {
        EventKind::Input | EventKind::Change => {
            r#"Object.defineProperty(event, 'target', { writable: false, value: el });
  Object.defineProperty(event, 'currentTarget', { writable: false, value: el });"#
        }
        _ => "",
    };
    format!(
        r#"const event = new {constructor}({kind}, {init});
  {pin}
  el.dispatchEvent(event);
  return {{ ok: true, value: null }};"#,
        constructor = constructor,
        kind = js_str(event.kind.dom_type()),
        init = init,
        pin = pin,
    )
}

/// Unpack the `{ ok, value }` / `{ stale }` envelope.
pub(crate) fn unwrap_envelope(handle: &ElementHandle, raw: Value) -> Result<Value, CoreError> {
    if raw.get("stale").and_then(Value::as_bool) == Some(true) {
        return Err(CoreError::stale(handle));
    }
    if raw.get("ok").and_then(Value::as_bool) == Some(true) {
        return Ok(raw.get("value").cloned().unwrap_or(Value::Null));
    }
    Err(CoreError::new(format!(
        "unexpected script result for {}: {}",
        handle, raw
    )))
}
