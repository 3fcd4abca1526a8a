use crate::browser::BrowserRuntime;
use crate::platforms::PlatformConfig;
use crate::tabs;
use log::{info, warn};

/// Bring the distraction tab for `config` to the foreground, opening a new
/// one at `config.full_url` if none exists.
///
/// An existing tab is activated, never navigated, so its content and scroll
/// position survive. Callers serialize calls per generation cycle: a freshly
/// created tab may not be discoverable yet, and a second call in that window
/// would open a duplicate.
pub fn switch_to<R: BrowserRuntime>(runtime: &mut R, config: &PlatformConfig) {
    info!("Switching to {}...", config.id);

    match tabs::find_by_pattern(runtime, config.url_pattern) {
        Some(tab) => {
            if let Err(e) = runtime.activate_tab(tab.id) {
                warn!("Failed to activate distraction tab {}: {}", tab.id, e);
            } else {
                info!("Activated existing tab: {}", tab.id);
            }
        }
        None => {
            if let Err(e) = runtime.create_tab(config.full_url, true) {
                warn!("Failed to create distraction tab: {}", e);
            } else {
                info!("Created new tab at {}", config.full_url);
            }
        }
    }
}

/// Pause any playing media in the distraction tab for `config`.
///
/// Best-effort cleanup: the tab may be closed, navigated away, or refuse the
/// injection. All of that is swallowed.
pub fn pause_media<R: BrowserRuntime>(runtime: &mut R, config: &PlatformConfig) {
    if let Some(tab) = tabs::find_by_pattern(runtime, config.url_pattern) {
        match runtime.pause_media(tab.id) {
            Ok(()) => info!("Paused media in distraction tab {}", tab.id),
            Err(e) => info!("Could not pause media in tab {}: {}", tab.id, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforms;
    use crate::test_utils::{MockRuntime, RuntimeAction};

    #[test]
    fn test_switch_activates_existing_tab() {
        let mut runtime = MockRuntime::with_tabs(&[
            (1, "https://mail.google.com/"),
            (2, "https://www.youtube.com/shorts/xyz"),
        ]);

        switch_to(&mut runtime, platforms::resolve("youtube"));

        assert_eq!(runtime.actions, vec![RuntimeAction::Activated(2)]);
    }

    #[test]
    fn test_switch_creates_tab_when_none_matches() {
        let mut runtime = MockRuntime::with_tabs(&[(1, "https://docs.rs/")]);

        switch_to(&mut runtime, platforms::resolve("youtube"));

        assert_eq!(
            runtime.actions,
            vec![RuntimeAction::Created {
                url: "https://www.youtube.com/shorts".to_string(),
                active: true,
            }]
        );
    }

    #[test]
    fn test_switch_never_creates_second_tab_when_one_exists() {
        let mut runtime = MockRuntime::with_tabs(&[(9, "https://www.tiktok.com/foryou")]);

        switch_to(&mut runtime, platforms::resolve("tiktok"));
        switch_to(&mut runtime, platforms::resolve("tiktok"));

        assert_eq!(
            runtime.actions,
            vec![RuntimeAction::Activated(9), RuntimeAction::Activated(9)]
        );
    }

    #[test]
    fn test_pause_targets_matching_tab() {
        let mut runtime = MockRuntime::with_tabs(&[(4, "https://www.instagram.com/reels/")]);

        pause_media(&mut runtime, platforms::resolve("instagram"));

        assert_eq!(runtime.actions, vec![RuntimeAction::Paused(4)]);
    }

    #[test]
    fn test_pause_without_matching_tab_is_a_noop() {
        let mut runtime = MockRuntime::with_tabs(&[(1, "https://docs.rs/")]);

        pause_media(&mut runtime, platforms::resolve("instagram"));

        assert!(runtime.actions.is_empty());
    }

    #[test]
    fn test_pause_failure_is_swallowed() {
        let mut runtime = MockRuntime::with_tabs(&[(4, "https://www.instagram.com/reels/")]);
        runtime.fail_commands = true;

        // Must not panic or propagate
        pause_media(&mut runtime, platforms::resolve("instagram"));
    }
}
