//! 分析埋点模块
//!
//! 经由页面里已加载的 gtag.js 上报页面浏览与关键操作。
//! 埋点永远不能影响功能：gtag 缺失、被广告拦截器移除或调用
//! 失败时静默跳过，只在控制台留一条记录。

use wasm_bindgen::prelude::*;

use crate::config;

/// 取 window.gtag，未加载则返回 None
fn gtag() -> Option<js_sys::Function> {
    let window = web_sys::window()?;
    let value = js_sys::Reflect::get(&window, &JsValue::from_str("gtag")).ok()?;
    value.dyn_into::<js_sys::Function>().ok()
}

fn call3(func: &js_sys::Function, a: &JsValue, b: &JsValue, c: &JsValue) {
    if func.call3(&JsValue::NULL, a, b, c).is_err() {
        web_sys::console::log_1(&"[Analytics] gtag call failed, ignoring.".into());
    }
}

/// 上报一次路由切换
pub fn page_view(path: &str) {
    let Some(id) = config::ga_measurement_id() else {
        return;
    };
    let Some(func) = gtag() else { return };

    let params = js_sys::Object::new();
    let _ = js_sys::Reflect::set(
        &params,
        &JsValue::from_str("page_path"),
        &JsValue::from_str(path),
    );
    call3(
        &func,
        &JsValue::from_str("config"),
        &JsValue::from_str(id),
        &params.into(),
    );
}

/// 上报一次业务事件，比赛相关事件附带 comp_id
pub fn event(name: &str, comp_id: Option<&str>) {
    if config::ga_measurement_id().is_none() {
        return;
    }
    let Some(func) = gtag() else { return };

    let params = js_sys::Object::new();
    if let Some(comp_id) = comp_id {
        let _ = js_sys::Reflect::set(
            &params,
            &JsValue::from_str("comp_id"),
            &JsValue::from_str(comp_id),
        );
    }
    call3(
        &func,
        &JsValue::from_str("event"),
        &JsValue::from_str(name),
        &params.into(),
    );
}
