// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - backend access layer.

pub mod api_client;
pub mod portal;
pub mod threew;

pub use api_client::{ApiClient, ApiRequest, ApiResponse, ClientError, MultipartForm, Upload};
pub use portal::PortalService;
pub use threew::ThreeWService;
