pub mod qr_payload;

pub use qr_payload::QrPayload;
