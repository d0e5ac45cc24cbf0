// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hover and selection highlight state.
//!
//! Each channel is a two-state machine:
//!
//! ```text
//! Empty ──hit r──▶ Highlighting(r) ──hit r──▶ Highlighting(r)   (no host call)
//!   ▲                    │
//!   └──────miss──────────┤──hit r'──▶ Highlighting(r')          (remove r, apply r')
//! ```
//!
//! The host overlay always mirrors the channel state: at most one element
//! is highlighted per channel, and an unchanged target never touches the
//! host, so hover updates can run on every pointer move.

use crate::config::ViewerConfig;
use crate::model::ElementRef;
use crate::pointer::NormalizedPoint;
use crate::resolver::ElementResolver;
use crate::scene::{HighlightChannel, OverlayStyle, SceneHost};

/// State of one highlight channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelState {
    #[default]
    Empty,
    Highlighting(ElementRef),
}

impl ChannelState {
    pub fn target(&self) -> Option<ElementRef> {
        match self {
            ChannelState::Empty => None,
            ChannelState::Highlighting(element) => Some(*element),
        }
    }
}

/// Effect of a channel update on the host overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Same target as before, host untouched
    Unchanged,
    /// Empty channel started highlighting
    Applied(ElementRef),
    /// Previous overlay removed, new one applied
    Replaced {
        previous: ElementRef,
        current: ElementRef,
    },
    /// Overlay removed, channel empty
    Cleared(ElementRef),
}

#[derive(Debug, Clone)]
struct Channel {
    style: OverlayStyle,
    state: ChannelState,
}

impl Channel {
    fn new(style: OverlayStyle) -> Self {
        Self {
            style,
            state: ChannelState::Empty,
        }
    }

    fn transition<H: SceneHost + ?Sized>(
        &mut self,
        host: &mut H,
        next: Option<ElementRef>,
    ) -> Transition {
        let transition = match (self.state, next) {
            (ChannelState::Empty, None) => Transition::Unchanged,
            (ChannelState::Highlighting(current), Some(next)) if current == next => {
                Transition::Unchanged
            }
            (ChannelState::Empty, Some(next)) => {
                host.add_overlay(next.model_id, &[next.element_id], &self.style, false);
                Transition::Applied(next)
            }
            (ChannelState::Highlighting(previous), Some(next)) => {
                host.remove_overlay(previous.model_id, &self.style);
                host.add_overlay(next.model_id, &[next.element_id], &self.style, false);
                Transition::Replaced {
                    previous,
                    current: next,
                }
            }
            (ChannelState::Highlighting(previous), None) => {
                host.remove_overlay(previous.model_id, &self.style);
                Transition::Cleared(previous)
            }
        };

        self.state = match next {
            Some(element) => ChannelState::Highlighting(element),
            None => ChannelState::Empty,
        };

        if transition != Transition::Unchanged {
            tracing::debug!(channel = %self.style.channel, ?transition, "Highlight changed");
        }
        transition
    }
}

/// Owner of the hover and selection channels of one viewer session.
#[derive(Debug, Clone)]
pub struct HighlightStateManager {
    hover: Channel,
    selection: Channel,
}

impl HighlightStateManager {
    pub fn new(hover_style: OverlayStyle, selection_style: OverlayStyle) -> Self {
        Self {
            hover: Channel::new(hover_style),
            selection: Channel::new(selection_style),
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(
            config.overlay_style(HighlightChannel::Hover),
            config.overlay_style(HighlightChannel::Selection),
        )
    }

    pub fn state(&self, channel: HighlightChannel) -> ChannelState {
        self.channel(channel).state
    }

    pub fn hover_target(&self) -> Option<ElementRef> {
        self.hover.state.target()
    }

    pub fn selected_target(&self) -> Option<ElementRef> {
        self.selection.state.target()
    }

    pub fn style(&self, channel: HighlightChannel) -> &OverlayStyle {
        &self.channel(channel).style
    }

    /// Hover whatever lies under `point`, or clear the hover on a miss
    pub fn update_hover<H: SceneHost + ?Sized>(
        &mut self,
        host: &mut H,
        point: NormalizedPoint,
    ) -> Transition {
        let target = pick(&*host, point);
        self.hover.transition(host, target)
    }

    /// Select whatever lies under `point`, or clear the selection on a miss.
    ///
    /// Returns the selected element, also when it was already selected.
    pub fn commit_selection<H: SceneHost + ?Sized>(
        &mut self,
        host: &mut H,
        point: NormalizedPoint,
    ) -> Option<ElementRef> {
        let target = pick(&*host, point);
        self.selection.transition(host, target);
        target
    }

    pub fn clear_selection<H: SceneHost + ?Sized>(&mut self, host: &mut H) -> Transition {
        self.selection.transition(host, None)
    }

    pub fn clear_hover<H: SceneHost + ?Sized>(&mut self, host: &mut H) -> Transition {
        self.hover.transition(host, None)
    }

    /// Drive a channel to an already resolved target
    pub fn set_target<H: SceneHost + ?Sized>(
        &mut self,
        host: &mut H,
        channel: HighlightChannel,
        target: Option<ElementRef>,
    ) -> Transition {
        match channel {
            HighlightChannel::Hover => self.hover.transition(host, target),
            HighlightChannel::Selection => self.selection.transition(host, target),
        }
    }

    fn channel(&self, channel: HighlightChannel) -> &Channel {
        match channel {
            HighlightChannel::Hover => &self.hover,
            HighlightChannel::Selection => &self.selection,
        }
    }
}

impl Default for HighlightStateManager {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}

/// Cast and resolve; unresolvable hits count as misses
fn pick<H: SceneHost + ?Sized>(host: &H, point: NormalizedPoint) -> Option<ElementRef> {
    let hit = host.cast_ray(point)?;
    match ElementResolver::resolve(&hit) {
        Ok(element) => Some(element),
        Err(e) => {
            tracing::debug!(error = %e, "Ray hit not resolvable, treating as miss");
            None
        }
    }
}
