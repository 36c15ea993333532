// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Audible new-message feedback.
//!
//! A small headless service: it listens for message arrivals and rings the
//! terminal bell, unless the conversation is muted or the user switched the
//! sound off. It tracks the sound preference through the same event the
//! settings screen publishes, so it never needs to see the configuration.

use std::cell::Cell;
use std::rc::Rc;

use crate::{
    events::{Event, EventKind, EventManager},
    util::term,
};

/// Attaches the feedback listeners to the bus.
///
/// The service lives for the lifetime of the process, so the subscription
/// handles are intentionally not kept.
pub(crate) fn mount(bus: &EventManager, sound_enabled: bool) {
    let enabled = Rc::new(Cell::new(sound_enabled));

    let on_arrival = Rc::clone(&enabled);
    let _ = bus.add_listener(EventKind::MessageArrived, move |event| {
        if let Event::MessageArrived { muted, .. } = event {
            if on_arrival.get() && !muted {
                term::ring_bell();
            }
        }
        Ok(())
    });

    let _ = bus.add_listener(EventKind::SoundEnabledChanged, move |event| {
        if let Event::SoundEnabledChanged(on) = event {
            enabled.set(*on);
        }
        Ok(())
    });
}
