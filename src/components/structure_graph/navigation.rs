//! Opening detail documents from the browser window.

use log::{info, warn};
use wasm_bindgen::JsValue;
use web_sys::Window;

/// Opens `href` in a new window, navigating the current one instead when
/// the popup is blocked.
pub fn open_detail(href: &str) -> Result<(), JsValue> {
	let window: Window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

	match window.open_with_url(href) {
		Ok(Some(_)) => {
			info!("structure-graph: opened {href}");
			return Ok(());
		}
		Ok(None) => warn!("structure-graph: popup blocked, navigating to {href}"),
		Err(e) => warn!("structure-graph: window.open failed ({e:?}), navigating to {href}"),
	}

	window.location().set_href(href)
}
