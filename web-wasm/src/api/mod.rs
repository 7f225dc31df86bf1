//! バックエンドAPIクライアント

mod backend;
mod client;

pub use backend::{
    create_supplier, pricing_presigned_url, register, search, signin, subscribe, subscriptions,
    suggest, supplier_details, unsubscribe, upload_pricing_file, verify, PricingUploadForm,
    SigninResponse, SupplierForm, SupplierInfo, CSV_CONTENT_TYPE,
};
