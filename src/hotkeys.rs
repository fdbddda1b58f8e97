/// Global hotkey registry
///
/// One process-wide registry maps physical keys to button slots, backed
/// by the OS global-hotkey facility. Invariants:
/// - at most one active OS registration per physical key, at all times
/// - the bookkeeping map and the OS registration set never diverge
///
/// The pure bookkeeping lives in `KeyBindings` so the conflict/swap
/// logic is testable without a display server.
use std::collections::HashMap;

use global_hotkey::hotkey::{Code, HotKey};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::button::ButtonConfig;

#[derive(Debug, Error)]
pub enum HotkeyError {
    #[error("Global hotkeys are not available on this system")]
    Unavailable,

    #[error("Unknown key name: '{0}'")]
    UnknownKey(String),

    #[error("Key '{key}' is already assigned to button {holder}")]
    KeyInUse { key: String, holder: usize },

    #[error("Hotkey backend error: {0}")]
    Backend(#[from] global_hotkey::Error),
}

/// Canonical form of a key name: trimmed, lower-case
pub fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Map a canonical key name to the OS key code
///
/// Supported: a-z, 0-9, f1-f12, space and the arrow keys. Anything else
/// is rejected at parse time rather than failing deep in the backend.
pub fn key_code(name: &str) -> Option<Code> {
    let code = match name {
        "a" => Code::KeyA,
        "b" => Code::KeyB,
        "c" => Code::KeyC,
        "d" => Code::KeyD,
        "e" => Code::KeyE,
        "f" => Code::KeyF,
        "g" => Code::KeyG,
        "h" => Code::KeyH,
        "i" => Code::KeyI,
        "j" => Code::KeyJ,
        "k" => Code::KeyK,
        "l" => Code::KeyL,
        "m" => Code::KeyM,
        "n" => Code::KeyN,
        "o" => Code::KeyO,
        "p" => Code::KeyP,
        "q" => Code::KeyQ,
        "r" => Code::KeyR,
        "s" => Code::KeyS,
        "t" => Code::KeyT,
        "u" => Code::KeyU,
        "v" => Code::KeyV,
        "w" => Code::KeyW,
        "x" => Code::KeyX,
        "y" => Code::KeyY,
        "z" => Code::KeyZ,
        "0" => Code::Digit0,
        "1" => Code::Digit1,
        "2" => Code::Digit2,
        "3" => Code::Digit3,
        "4" => Code::Digit4,
        "5" => Code::Digit5,
        "6" => Code::Digit6,
        "7" => Code::Digit7,
        "8" => Code::Digit8,
        "9" => Code::Digit9,
        "f1" => Code::F1,
        "f2" => Code::F2,
        "f3" => Code::F3,
        "f4" => Code::F4,
        "f5" => Code::F5,
        "f6" => Code::F6,
        "f7" => Code::F7,
        "f8" => Code::F8,
        "f9" => Code::F9,
        "f10" => Code::F10,
        "f11" => Code::F11,
        "f12" => Code::F12,
        "space" => Code::Space,
        "up" => Code::ArrowUp,
        "down" => Code::ArrowDown,
        "left" => Code::ArrowLeft,
        "right" => Code::ArrowRight,
        _ => return None,
    };
    Some(code)
}

/// Pure key -> button bookkeeping (no OS calls)
#[derive(Debug, Default)]
pub struct KeyBindings {
    by_key: HashMap<String, usize>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Which button holds this key, if any
    pub fn holder_of(&self, key: &str) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    /// Which key this button holds, if any
    pub fn key_of(&self, button: usize) -> Option<&str> {
        self.by_key
            .iter()
            .find(|(_, b)| **b == button)
            .map(|(k, _)| k.as_str())
    }

    /// Claim a key for a button
    ///
    /// Re-claiming a key the button already holds is a no-op; a key held
    /// by a different button is a conflict.
    pub fn claim(&mut self, key: &str, button: usize) -> Result<(), HotkeyError> {
        match self.holder_of(key) {
            Some(holder) if holder == button => Ok(()),
            Some(holder) => Err(HotkeyError::KeyInUse {
                key: key.to_string(),
                holder,
            }),
            None => {
                self.by_key.insert(key.to_string(), button);
                Ok(())
            }
        }
    }

    /// Release whatever key a button holds, returning it
    pub fn release_button(&mut self, button: usize) -> Option<String> {
        let key = self.key_of(button)?.to_string();
        self.by_key.remove(&key);
        Some(key)
    }

    pub fn clear(&mut self) {
        self.by_key.clear();
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// Registry tying `KeyBindings` to the OS hotkey manager
pub struct HotkeyRegistry {
    /// None when the OS backend could not start (no display server,
    /// missing permissions); the app then runs click-only
    manager: Option<GlobalHotKeyManager>,
    bindings: KeyBindings,
    /// Live OS registration per bound key (needed to unregister)
    hotkeys: HashMap<String, HotKey>,
    /// OS event id -> button slot, for O(1) dispatch
    by_event_id: HashMap<u32, usize>,
}

impl HotkeyRegistry {
    pub fn new() -> Self {
        let manager = match GlobalHotKeyManager::new() {
            Ok(m) => {
                info!("[Hotkeys] Global hotkey manager started");
                Some(m)
            }
            Err(e) => {
                warn!("[Hotkeys] Global hotkeys unavailable: {} (click-only mode)", e);
                None
            }
        };
        Self {
            manager,
            bindings: KeyBindings::new(),
            hotkeys: HashMap::new(),
            by_event_id: HashMap::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.manager.is_some()
    }

    /// Which key a button currently holds
    pub fn key_of(&self, button: usize) -> Option<&str> {
        self.bindings.key_of(button)
    }

    /// Which button holds a key
    pub fn holder_of(&self, key: &str) -> Option<usize> {
        self.bindings.holder_of(key)
    }

    /// Register `key` for `button` with the OS
    pub fn bind(&mut self, key: &str, button: usize) -> Result<(), HotkeyError> {
        let key = normalize_key(key);
        let code = key_code(&key).ok_or_else(|| HotkeyError::UnknownKey(key.clone()))?;

        // No-op when the button already holds this key
        if self.bindings.holder_of(&key) == Some(button) {
            return Ok(());
        }

        let manager = self.manager.as_ref().ok_or(HotkeyError::Unavailable)?;

        // Claim first: a conflict must not touch the OS at all
        self.bindings.claim(&key, button)?;

        let hotkey = HotKey::new(None, code);
        if let Err(e) = manager.register(hotkey) {
            // Roll the claim back so the maps stay in sync with the OS
            self.bindings.release_button(button);
            return Err(e.into());
        }

        self.by_event_id.insert(hotkey.id(), button);
        self.hotkeys.insert(key.clone(), hotkey);
        debug!("[Hotkeys] Bound '{}' to button {}", key, button);
        Ok(())
    }

    /// Reassign a button's key
    ///
    /// The new key is registered before the old one is released, so a
    /// failed registration leaves the previous binding fully intact.
    pub fn rebind(&mut self, button: usize, new_key: Option<&str>) -> Result<(), HotkeyError> {
        let old_key = self.bindings.key_of(button).map(|k| k.to_string());

        let new_key = new_key.map(normalize_key);
        if new_key.as_deref() == old_key.as_deref() {
            return Ok(());
        }

        match new_key {
            Some(key) => {
                self.bind(&key, button)?;
                // bind() claimed the new key; the stale entry for the old
                // key still points at this button, drop it now
                if let Some(old) = old_key {
                    self.unregister_key(&old);
                }
                Ok(())
            }
            None => {
                self.unbind(button);
                Ok(())
            }
        }
    }

    /// Drop a button's binding, if any
    pub fn unbind(&mut self, button: usize) {
        if let Some(key) = self.bindings.key_of(button).map(|k| k.to_string()) {
            self.unregister_key(&key);
        }
    }

    /// Release a single key's OS registration and bookkeeping
    fn unregister_key(&mut self, key: &str) {
        if let Some(hotkey) = self.hotkeys.remove(key) {
            self.by_event_id.remove(&hotkey.id());
            if let Some(manager) = &self.manager {
                if let Err(e) = manager.unregister(hotkey) {
                    // The OS side may already be gone; keep the maps clean
                    warn!("[Hotkeys] Failed to unregister '{}': {}", key, e);
                }
            }
        }
        self.bindings.by_key.remove(key);
    }

    /// Release everything (grid rebuild, profile load, shutdown)
    pub fn clear(&mut self) {
        let keys: Vec<String> = self.hotkeys.keys().cloned().collect();
        for key in keys {
            self.unregister_key(&key);
        }
        self.bindings.clear();
    }

    /// Re-register the hotkeys of every visible button
    ///
    /// Duplicate keys in a loaded profile resolve to the lowest id; the
    /// losers are logged and skipped. Hidden buttons keep their config
    /// but get no active hotkey.
    pub fn rebuild(&mut self, buttons: &[ButtonConfig], visible: usize) {
        self.clear();
        if self.manager.is_none() {
            return;
        }
        for config in buttons.iter().take(visible) {
            let Some(key) = &config.hotkey else { continue };
            match self.bind(key, config.id) {
                Ok(()) => {}
                Err(HotkeyError::KeyInUse { key, holder }) => {
                    warn!(
                        "[Hotkeys] Button {} wants '{}' but button {} holds it; skipped",
                        config.id, key, holder
                    );
                }
                Err(e) => {
                    warn!("[Hotkeys] Could not bind '{}' for button {}: {}", key, config.id, e);
                }
            }
        }
        info!("[Hotkeys] Registered {} hotkey(s)", self.bindings.len());
    }

    /// Drain pending OS events; returns the buttons whose keys were
    /// pressed (press edges only)
    pub fn poll(&mut self) -> Vec<usize> {
        let mut pressed = Vec::new();
        while let Ok(event) = GlobalHotKeyEvent::receiver().try_recv() {
            if event.state != HotKeyState::Pressed {
                continue;
            }
            if let Some(button) = self.by_event_id.get(&event.id) {
                pressed.push(*button);
            }
        }
        pressed
    }
}

impl Drop for HotkeyRegistry {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  F5 "), "f5");
        assert_eq!(normalize_key("A"), "a");
        assert_eq!(normalize_key("space"), "space");
    }

    #[test]
    fn test_key_code_accepts_supported_keys() {
        assert_eq!(key_code("a"), Some(Code::KeyA));
        assert_eq!(key_code("9"), Some(Code::Digit9));
        assert_eq!(key_code("f12"), Some(Code::F12));
        assert_eq!(key_code("space"), Some(Code::Space));
        assert_eq!(key_code("left"), Some(Code::ArrowLeft));
    }

    #[test]
    fn test_key_code_rejects_unknown_keys() {
        assert_eq!(key_code(""), None);
        assert_eq!(key_code("ctrl+a"), None);
        assert_eq!(key_code("f13"), None);
        assert_eq!(key_code("ñ"), None);
    }

    #[test]
    fn test_claim_and_conflict() {
        let mut b = KeyBindings::new();
        b.claim("a", 0).unwrap();

        // Re-claiming your own key is fine
        b.claim("a", 0).unwrap();
        assert_eq!(b.len(), 1);

        // Someone else's key is not
        let err = b.claim("a", 1).unwrap_err();
        match err {
            HotkeyError::KeyInUse { key, holder } => {
                assert_eq!(key, "a");
                assert_eq!(holder, 0);
            }
            other => panic!("Expected KeyInUse, got {:?}", other),
        }
    }

    #[test]
    fn test_release_button() {
        let mut b = KeyBindings::new();
        b.claim("f1", 3).unwrap();
        b.claim("f2", 4).unwrap();

        assert_eq!(b.release_button(3).as_deref(), Some("f1"));
        assert_eq!(b.holder_of("f1"), None);
        // f2 untouched
        assert_eq!(b.holder_of("f2"), Some(4));

        // Releasing an unbound button is a no-op
        assert_eq!(b.release_button(9), None);
    }

    #[test]
    fn test_reverse_lookup() {
        let mut b = KeyBindings::new();
        b.claim("q", 7).unwrap();
        assert_eq!(b.key_of(7), Some("q"));
        assert_eq!(b.key_of(8), None);
    }

    #[test]
    fn test_one_key_per_button_after_swap() {
        // Simulate the swap bookkeeping: claim new, release old
        let mut b = KeyBindings::new();
        b.claim("a", 0).unwrap();
        b.claim("b", 0).unwrap();
        // Both point at button 0 until the old key is dropped; the
        // registry's rebind() always removes the stale one
        b.by_key.remove("a");
        assert_eq!(b.key_of(0), Some("b"));
        assert_eq!(b.len(), 1);
    }
}
