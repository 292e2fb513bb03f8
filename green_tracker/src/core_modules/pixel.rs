// THEORY (Dual-View Pixel):
// The `Pixel` module is the smallest unit the segmenter reasons about. A pixel is
// read in two views at once:
// - the display view: the raw red/green/blue bytes as captured
// - the perceptual view: hue/saturation/value derived from those bytes
//
// The perceptual view follows the 8-bit convention used by camera tooling:
// hue is halved into 0..180 so it fits a byte, saturation and value span 0..255.
// Only the display channels drive the current classification rule; the
// perceptual channels are carried so that hue/saturation thresholds can be added
// without touching the scan loop.
//
// Like every "dumb" container in `core_modules`, a `Pixel` has no knowledge of
// its neighbors or of previous frames.

pub mod pixel {
    pub type Channel = u8;

    /// Both views of a single RGB pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
        /// Hue in half-degrees (0-179).
        pub hue: Channel,
        /// HSV saturation (0-255).
        pub saturation: Channel,
        /// HSV value, the brightest channel (0-255).
        pub value: Channel,
    }

    impl Pixel {
        pub fn from_rgb(red: Channel, green: Channel, blue: Channel) -> Self {
            let (hue, saturation, value) = Self::hsv_from_rgb(red, green, blue);
            Pixel {
                red,
                green,
                blue,
                hue,
                saturation,
                value,
            }
        }

        /// 8-bit HSV conversion: H = degrees / 2, S = 255 * chroma / V, V = max.
        fn hsv_from_rgb(red: Channel, green: Channel, blue: Channel) -> (Channel, Channel, Channel) {
            let maximum_channel = red.max(green).max(blue);
            let minimum_channel = red.min(green).min(blue);
            let chroma = (maximum_channel - minimum_channel) as f32;

            let value = maximum_channel;
            let saturation = if maximum_channel == 0 {
                0
            } else {
                (255.0 * chroma / maximum_channel as f32).round() as Channel
            };

            if chroma == 0.0 {
                return (0, saturation, value);
            }

            let (red, green, blue) = (red as f32, green as f32, blue as f32);
            let mut hue_degrees = if maximum_channel as f32 == red {
                60.0 * (green - blue) / chroma
            } else if maximum_channel as f32 == green {
                120.0 + 60.0 * (blue - red) / chroma
            } else {
                240.0 + 60.0 * (red - green) / chroma
            };
            if hue_degrees < 0.0 {
                hue_degrees += 360.0;
            }

            // 359.x degrees rounds to 180, which wraps back to red.
            let hue = ((hue_degrees / 2.0).round() as u16 % 180) as Channel;
            (hue, saturation, value)
        }

        /// Green dominates when it clears the absolute floor and beats both
        /// other channels by `ratio`.
        #[inline]
        pub fn is_green_dominant(&self, min_green: Channel, ratio: f64) -> bool {
            let green = self.green as f64;
            self.green > min_green && green > self.red as f64 * ratio && green > self.blue as f64 * ratio
        }
    }

    impl From<&image::Rgb<u8>> for Pixel {
        fn from(rgb: &image::Rgb<u8>) -> Self {
            let [red, green, blue] = rgb.0;
            Pixel::from_rgb(red, green, blue)
        }
    }
}
