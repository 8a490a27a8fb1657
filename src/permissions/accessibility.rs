//! Accessibility trust query through ApplicationServices

use super::TrustQuery;
use core_foundation::base::TCFType;
use core_foundation::boolean::CFBoolean;
use core_foundation::dictionary::{CFDictionary, CFDictionaryRef};
use core_foundation::string::{CFString, CFStringRef};
use log::debug;

#[link(name = "ApplicationServices", kind = "framework")]
extern "C" {
    fn AXIsProcessTrusted() -> bool;
    fn AXIsProcessTrustedWithOptions(options: CFDictionaryRef) -> bool;

    static kAXTrustedCheckOptionPrompt: CFStringRef;
}

/// Asks the system whether this process may observe keyboard input
pub struct AccessibilityTrust;

impl TrustQuery for AccessibilityTrust {
    fn is_trusted(&self, prompt: bool) -> bool {
        let trusted = if prompt {
            unsafe {
                let key = CFString::wrap_under_get_rule(kAXTrustedCheckOptionPrompt);
                let options =
                    CFDictionary::from_CFType_pairs(&[(key, CFBoolean::true_value())]);
                AXIsProcessTrustedWithOptions(options.as_concrete_TypeRef())
            }
        } else {
            unsafe { AXIsProcessTrusted() }
        };

        debug!("Accessibility trusted: {} (prompt: {})", trusted, prompt);
        trusted
    }
}
