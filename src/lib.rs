pub mod api;
pub mod color;
pub mod config;
pub mod encoder;
pub mod error;
pub mod generator;
pub mod normalize;
pub mod profile;
pub mod render;
pub mod types;

pub use api::{ApiRequest, ApiResponse, HealthStatus};
pub use encoder::{EncodeFault, QrcodeEncoder, Symbol, SymbolEncoder};
pub use error::{QrGenError, Result};
pub use types::{
    CapacityTable, ColorValue, ErrorCorrectionLevel, GeneratorConfig, QrRequest, QrResult,
    SizeProfile, SizeTier,
};

use rayon::prelude::*;

/// Generate one QR code with the default `qrcode` backend.
pub fn generate(request: &ApiRequest, config: &GeneratorConfig) -> Result<QrResult> {
    generator::generate_with(&QrcodeEncoder, &request.resolve(config), config)
}

/// Generate independent requests in parallel; results keep input order.
pub fn generate_many(requests: &[ApiRequest], config: &GeneratorConfig) -> Vec<Result<QrResult>> {
    requests
        .par_iter()
        .map(|request| generate(request, config))
        .collect()
}

/// [`generate`], shaped for a JSON response.
pub fn handle(request: &ApiRequest, config: &GeneratorConfig) -> ApiResponse {
    generate(request, config).into()
}
