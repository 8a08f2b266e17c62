use crate::frame::Frame;

/// Signed amount added to every channel of every pixel, within [`Offset::MIN`, `Offset::MAX`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Offset(i16);

impl Offset {
    pub const MIN: i32 = -100;
    pub const MAX: i32 = 100;

    pub fn new(value: i32) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&value)
            .then_some(Self(value as i16))
    }

    pub fn get(self) -> i32 {
        self.0 as i32
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

/// Saturating addition of `offset` to every pixel channel; row padding is left as is.
pub fn adjust_brightness(mut frame: Frame, offset: Offset) -> Frame {
    if !offset.is_zero() {
        frame
            .rows_mut()
            .for_each(|row| adjust_channels(row, offset));
    }
    frame
}

fn adjust_channels(channels: &mut [u8], offset: Offset) {
    // i16 holds every value in [0 + MIN, 255 + MAX]
    let offset = offset.0;
    for channel in channels {
        *channel = (*channel as i16 + offset).clamp(0, u8::MAX as i16) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ChannelOrder;

    fn offset(value: i32) -> Offset {
        Offset::new(value).unwrap()
    }

    fn uniform(value: u8, width: u32, height: u32) -> Frame {
        Frame::packed(
            width,
            height,
            ChannelOrder::Bgr,
            vec![value; (width * height * 3) as usize],
        )
    }

    #[test]
    fn test_offset_bounds() {
        assert_eq!(None, Offset::new(-101));
        assert_eq!(None, Offset::new(101));
        assert_eq!(Some(-100), Offset::new(-100).map(Offset::get));
        assert_eq!(Some(100), Offset::new(100).map(Offset::get));
        assert_eq!(0, Offset::default().get());
    }

    #[test]
    fn test_adjust_is_clamped_addition_for_every_value_and_offset() {
        for o in Offset::MIN..=Offset::MAX {
            let mut channels = (0..=255).collect::<Vec<u8>>();
            adjust_channels(&mut channels, offset(o));

            for (v, adjusted) in (0..=255).zip(channels) {
                assert_eq!((v + o).clamp(0, 255) as u8, adjusted, "v={v} o={o}");
            }
        }
    }

    #[test]
    fn test_zero_offset_keeps_frame() {
        let frame = Frame::packed(2, 1, ChannelOrder::Rgb, vec![0, 1, 127, 128, 254, 255]);

        assert_eq!(frame.clone(), adjust_brightness(frame, Offset::default()));
    }

    #[test]
    fn test_opposite_offsets_round_trip_only_without_saturation() {
        for o in Offset::MIN..=Offset::MAX {
            for v in 0..=255i32 {
                let mut channel = [v as u8];
                adjust_channels(&mut channel, offset(o));
                adjust_channels(&mut channel, offset(-o));

                let once = (v + o).clamp(0, 255);
                let twice = (once - o).clamp(0, 255);
                assert_eq!(twice as u8, channel[0], "v={v} o={o}");

                if (0..=255).contains(&(v + o)) {
                    assert_eq!(v as u8, channel[0], "v={v} o={o}");
                }
            }
        }

        // saturation loses information
        let mut channel = [240];
        adjust_channels(&mut channel, offset(50));
        adjust_channels(&mut channel, offset(-50));
        assert_eq!([205], channel);
    }

    #[test]
    fn test_brighten_midtones() {
        let frame = adjust_brightness(uniform(100, 4, 3), offset(50));

        assert!(frame.data().iter().all(|&c| c == 150));
    }

    #[test]
    fn test_brighten_saturates_at_white() {
        let frame = adjust_brightness(uniform(240, 4, 3), offset(50));

        assert!(frame.data().iter().all(|&c| c == 255));
    }

    #[test]
    fn test_darken_saturates_at_black() {
        let frame = adjust_brightness(uniform(10, 4, 3), offset(-50));

        assert!(frame.data().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_row_padding_is_untouched() {
        // 1 pixel per row, 2 bytes of padding per row
        let data = vec![10, 20, 30, 7, 7, 40, 50, 60, 7, 7];
        let frame = Frame::new(1, 2, 5, ChannelOrder::Rgb, data).unwrap();

        let frame = adjust_brightness(frame, offset(5));

        assert_eq!(&[15, 25, 35, 7, 7, 45, 55, 65, 7, 7], frame.data());
    }
}
