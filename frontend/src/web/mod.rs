//! 原生 Web API 封装模块
//!
//! 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
//! 以减小 WASM 二进制体积。路由也放在这里：它同样只是对
//! History API 的封装加上纯逻辑的路径解析。

pub mod http;
pub mod route;
pub mod router;
pub mod storage;
pub mod timer;

pub use http::HttpClient;
