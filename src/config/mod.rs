pub mod params;
pub mod schema;

pub use params::{ParamDef, Params};
pub use schema::{
    BrowserConfig, Config, LoginConfig, MenuSelectors, OnFailure, PortalConfig, TimingConfig,
    Viewport,
};
