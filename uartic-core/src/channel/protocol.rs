//! Protocol fault interrupt path

use uartic_hal::{ProtocolEvents, StatusFlags, UartHardware};

use super::UartChannel;
use crate::callback::{EventData, UartCallback, UartEvent};

struct Fault {
    status: StatusFlags,
    enable: ProtocolEvents,
    event: UartEvent,
}

/// Scan order of the protocol interrupt; only the first active fault is
/// cleared and reported per interrupt
const FAULT_TABLE: [Fault; 5] = [
    Fault {
        status: StatusFlags::SYNC_BREAK_DETECTED,
        enable: ProtocolEvents::SYNC_BREAK,
        event: UartEvent::SyncBreakDetect,
    },
    Fault {
        status: StatusFlags::RECEIVER_NOISE_DETECTED,
        enable: ProtocolEvents::RECEIVER_NOISE,
        event: UartEvent::ReceiverNoiseDetect,
    },
    Fault {
        status: StatusFlags::FORMAT_ERROR_STOP_BIT_0,
        enable: ProtocolEvents::FORMAT_ERROR,
        event: UartEvent::FormatError0,
    },
    Fault {
        status: StatusFlags::FORMAT_ERROR_STOP_BIT_1,
        enable: ProtocolEvents::FORMAT_ERROR,
        event: UartEvent::FormatError1,
    },
    Fault {
        status: StatusFlags::COLLISION_DETECTED,
        enable: ProtocolEvents::COLLISION,
        event: UartEvent::CollisionDetect,
    },
];

impl<H: UartHardware> UartChannel<H> {
    /// Protocol (error) interrupt entry
    pub fn on_protocol_interrupt<C: UartCallback<H>>(&mut self, callback: &mut C) {
        let enabled = self.hw.protocol_events();
        let status = self.hw.status_flags();

        let Some(fault) = FAULT_TABLE
            .iter()
            .find(|fault| enabled.contains(fault.enable) && status.contains(fault.status))
        else {
            return;
        };

        self.hw.clear_status_flags(fault.status);
        debug!("uart{}: protocol fault {}", self.id.index(), fault.event);
        callback.on_event(self, EventData::None, fault.event);
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ChannelConfig;
    use crate::testing::{board_channel, open_channel, Recorder};
    use crate::UartEvent;
    use uartic_hal::{ProtocolEvents, StatusFlags, UartHardware};
    use uartic_sim::SimNvic;

    fn monitored() -> crate::UartChannel<uartic_sim::SimUsic> {
        let mut uart = board_channel(0);
        uart.init(crate::InitRequest::Open, &mut SimNvic::new())
            .unwrap();
        uart
    }

    #[test]
    fn test_each_fault_maps_to_its_event() {
        let cases = [
            (StatusFlags::SYNC_BREAK_DETECTED, UartEvent::SyncBreakDetect),
            (StatusFlags::RECEIVER_NOISE_DETECTED, UartEvent::ReceiverNoiseDetect),
            (StatusFlags::FORMAT_ERROR_STOP_BIT_0, UartEvent::FormatError0),
            (StatusFlags::FORMAT_ERROR_STOP_BIT_1, UartEvent::FormatError1),
            (StatusFlags::COLLISION_DETECTED, UartEvent::CollisionDetect),
        ];
        for (flag, event) in cases {
            let mut uart = monitored();
            let mut recorder = Recorder::default();
            uart.hardware_mut().raise_status(flag);
            assert!(uart.hardware().protocol_interrupt_pending());

            uart.on_protocol_interrupt(&mut recorder);
            assert_eq!(recorder.events, vec![event]);
            assert!(uart.hardware().status().is_empty());
        }
    }

    #[test]
    fn test_first_match_wins() {
        let mut uart = monitored();
        let mut recorder = Recorder::default();
        uart.hardware_mut().raise_status(
            StatusFlags::COLLISION_DETECTED | StatusFlags::RECEIVER_NOISE_DETECTED,
        );

        uart.on_protocol_interrupt(&mut recorder);
        assert_eq!(recorder.events, vec![UartEvent::ReceiverNoiseDetect]);
        assert_eq!(uart.hardware().status(), StatusFlags::COLLISION_DETECTED);

        // Remaining fault needs another interrupt
        uart.on_protocol_interrupt(&mut recorder);
        assert_eq!(
            recorder.events,
            vec![UartEvent::ReceiverNoiseDetect, UartEvent::CollisionDetect]
        );
    }

    #[test]
    fn test_disabled_fault_is_ignored() {
        // No protocol routing, so nothing is monitored
        let mut uart = open_channel(ChannelConfig::default());
        let mut recorder = Recorder::default();
        assert!(uart.hardware_mut().protocol_events().is_empty());

        uart.hardware_mut().raise_status(StatusFlags::SYNC_BREAK_DETECTED);
        uart.on_protocol_interrupt(&mut recorder);
        assert!(recorder.events.is_empty());
        assert_eq!(uart.hardware().status(), StatusFlags::SYNC_BREAK_DETECTED);
    }

    #[test]
    fn test_partial_enable_mask() {
        let mut uart = open_channel(ChannelConfig::default());
        let mut recorder = Recorder::default();
        uart.hardware_mut()
            .enable_protocol_events(ProtocolEvents::COLLISION);
        uart.hardware_mut().raise_status(
            StatusFlags::SYNC_BREAK_DETECTED | StatusFlags::COLLISION_DETECTED,
        );

        uart.on_protocol_interrupt(&mut recorder);
        assert_eq!(recorder.events, vec![UartEvent::CollisionDetect]);
    }
}
