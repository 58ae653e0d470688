//! The widget catalogue. Each widget is an isolated rendering component;
//! they share nothing beyond the [`crate::widget::Widget`] contract.

pub mod card_nav;
pub mod click_spark;
pub mod faulty_terminal;
pub mod letter_glitch;
pub mod light_rays;
pub mod liquid_chrome;
pub mod metallic_paint;
pub mod plasma;

pub use card_nav::CardNav;
pub use click_spark::ClickSpark;
pub use faulty_terminal::FaultyTerminal;
pub use letter_glitch::LetterGlitch;
pub use light_rays::LightRays;
pub use liquid_chrome::LiquidChrome;
pub use metallic_paint::MetallicPaint;
pub use plasma::Plasma;
