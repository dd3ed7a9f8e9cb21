//! PCM capability model: sample rates, sample formats and the capability
//! descriptor that bundles them with a channel range.
//!
//! Rates and formats are kept as typed sets. The raw bitmasks the host
//! framework speaks are only produced at the boundary through
//! [`FlagSet::mask`] and [`FlagSet::from_mask`].

use core::fmt;
use core::hash::Hash;
use core::marker::PhantomData;

use itertools::Itertools;

use crate::error::CapabilityError;

/// A value that occupies one bit of a host capability mask.
pub trait PcmFlag: Copy + Eq + Hash + fmt::Debug + fmt::Display + 'static {
    /// Every variant, in ascending bit order.
    const ALL: &'static [Self];

    /// Bit index of this value in the host mask.
    fn bit(self) -> u32;
}

/// Supported sample rates and their `SNDRV_PCM_RATE_*` bit positions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SampleRate {
    R5512,
    R8000,
    R11025,
    R16000,
    R22050,
    R32000,
    R44100,
    R48000,
    R64000,
    R88200,
    R96000,
    R176400,
    R192000,
    R352800,
    R384000,
    // Late additions, appended after 384k to keep the mask ABI stable.
    R12000,
    R24000,
    R128000,
}

impl SampleRate {
    /// The rate in Hz.
    pub fn hz(self) -> u32 {
        match self {
            Self::R5512 => 5512,
            Self::R8000 => 8000,
            Self::R11025 => 11025,
            Self::R16000 => 16000,
            Self::R22050 => 22050,
            Self::R32000 => 32000,
            Self::R44100 => 44100,
            Self::R48000 => 48000,
            Self::R64000 => 64000,
            Self::R88200 => 88200,
            Self::R96000 => 96000,
            Self::R176400 => 176400,
            Self::R192000 => 192000,
            Self::R352800 => 352800,
            Self::R384000 => 384000,
            Self::R12000 => 12000,
            Self::R24000 => 24000,
            Self::R128000 => 128000,
        }
    }

    /// Looks up the enumerated rate for a frequency, if there is one.
    pub fn from_hz(hz: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.hz() == hz)
    }
}

impl PcmFlag for SampleRate {
    const ALL: &'static [Self] = &[
        Self::R5512,
        Self::R8000,
        Self::R11025,
        Self::R16000,
        Self::R22050,
        Self::R32000,
        Self::R44100,
        Self::R48000,
        Self::R64000,
        Self::R88200,
        Self::R96000,
        Self::R176400,
        Self::R192000,
        Self::R352800,
        Self::R384000,
        Self::R12000,
        Self::R24000,
        Self::R128000,
    ];

    fn bit(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Hz", self.hz())
    }
}

/// Byte order of a sample encoding, also used as the component-level hint.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum SampleEndianness {
    #[default]
    Little,
    Big,
}

/// Sample encodings, numbered as `SNDRV_PCM_FORMAT_*`.
///
/// The mask bit of a format is `1 << number`.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SampleFormat {
    S8,
    U8,
    S16_LE,
    S16_BE,
    U16_LE,
    U16_BE,
    S24_LE,
    S24_BE,
    U24_LE,
    U24_BE,
    S32_LE,
    S32_BE,
    U32_LE,
    U32_BE,
    FLOAT_LE,
    FLOAT_BE,
    FLOAT64_LE,
    FLOAT64_BE,
    /// IEC-958 (S/PDIF) subframe, little-endian.
    IEC958_SUBFRAME_LE,
    /// IEC-958 (S/PDIF) subframe, big-endian.
    IEC958_SUBFRAME_BE,
}

impl SampleFormat {
    /// Host format number.
    pub fn number(self) -> u32 {
        self as u32
    }

    /// Significant bits per sample.
    pub fn width(self) -> u32 {
        use SampleFormat::*;
        match self {
            S8 | U8 => 8,
            S16_LE | S16_BE | U16_LE | U16_BE => 16,
            S24_LE | S24_BE | U24_LE | U24_BE => 24,
            S32_LE | S32_BE | U32_LE | U32_BE | FLOAT_LE | FLOAT_BE => 32,
            FLOAT64_LE | FLOAT64_BE => 64,
            IEC958_SUBFRAME_LE | IEC958_SUBFRAME_BE => 32,
        }
    }

    /// Bits a sample occupies in memory. 24-bit formats sit in 32-bit words.
    pub fn physical_width(self) -> u32 {
        match self.width() {
            24 => 32,
            w => w,
        }
    }

    /// Byte order, or `None` for single-byte formats.
    pub fn endianness(self) -> Option<SampleEndianness> {
        if self.width() == 8 {
            return None;
        }
        // LE/BE variants alternate, starting with LE at an even number.
        if self.number() % 2 == 0 {
            Some(SampleEndianness::Little)
        } else {
            Some(SampleEndianness::Big)
        }
    }
}

impl PcmFlag for SampleFormat {
    const ALL: &'static [Self] = &[
        Self::S8,
        Self::U8,
        Self::S16_LE,
        Self::S16_BE,
        Self::U16_LE,
        Self::U16_BE,
        Self::S24_LE,
        Self::S24_BE,
        Self::U24_LE,
        Self::U24_BE,
        Self::S32_LE,
        Self::S32_BE,
        Self::U32_LE,
        Self::U32_BE,
        Self::FLOAT_LE,
        Self::FLOAT_BE,
        Self::FLOAT64_LE,
        Self::FLOAT64_BE,
        Self::IEC958_SUBFRAME_LE,
        Self::IEC958_SUBFRAME_BE,
    ];

    fn bit(self) -> u32 {
        self.number()
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A set of [`PcmFlag`] values.
///
/// Iteration follows ascending bit order, which is the order the host lists
/// them in.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagSet<T: PcmFlag> {
    bits: u64,
    _marker: PhantomData<T>,
}

/// Set of advertised sample rates.
pub type RateSet = FlagSet<SampleRate>;

/// Set of advertised sample formats.
pub type FormatSet = FlagSet<SampleFormat>;

impl<T: PcmFlag> FlagSet<T> {
    /// An empty set.
    pub fn empty() -> Self {
        Self {
            bits: 0,
            _marker: PhantomData,
        }
    }

    /// Builds a set from a raw host mask, rejecting bits no variant owns.
    pub fn from_mask(mask: u64) -> Result<Self, CapabilityError> {
        let known = T::ALL.iter().fold(0u64, |acc, v| acc | (1 << v.bit()));
        let unknown = mask & !known;
        if unknown != 0 {
            return Err(CapabilityError::UnknownMaskBits { mask, unknown });
        }
        Ok(Self {
            bits: mask,
            _marker: PhantomData,
        })
    }

    /// The raw host mask.
    pub fn mask(&self) -> u64 {
        self.bits
    }

    pub fn insert(&mut self, value: T) {
        self.bits |= 1 << value.bit();
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    pub fn contains(&self, value: T) -> bool {
        self.bits & (1 << value.bit()) != 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        T::ALL.iter().copied().filter(move |v| self.contains(*v))
    }
}

impl<T: PcmFlag> Default for FlagSet<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: PcmFlag> FromIterator<T> for FlagSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::empty();
        set.extend(iter);
        set
    }
}

impl<T: PcmFlag> Extend<T> for FlagSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for v in iter {
            self.insert(v);
        }
    }
}

impl<T: PcmFlag> fmt::Debug for FlagSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PcmFlag> fmt::Display for FlagSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iter().join(" | "))
    }
}

/// What a stream can carry: rates, formats and a channel range.
///
/// Construction is the only place invariants are checked; the value is
/// immutable afterwards.
///
/// ```
/// use phoneodeo_dir::{CapabilityDescriptor, FormatSet, RateSet, SampleFormat, SampleRate};
///
/// let caps = CapabilityDescriptor::new(
///     RateSet::empty().with(SampleRate::R48000),
///     FormatSet::empty().with(SampleFormat::S16_LE),
///     1,
///     2,
/// )
/// .unwrap();
///
/// assert!(caps.accepts(48000, SampleFormat::S16_LE, 2));
/// assert!(!caps.accepts(44100, SampleFormat::S16_LE, 2));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CapabilityDescriptor {
    rates: RateSet,
    formats: FormatSet,
    channels_min: u32,
    channels_max: u32,
}

impl CapabilityDescriptor {
    /// Validates and builds a descriptor.
    ///
    /// Fails on an empty rate or format set, a zero minimum channel count, or
    /// `channels_min > channels_max`.
    pub fn new(
        rates: RateSet,
        formats: FormatSet,
        channels_min: u32,
        channels_max: u32,
    ) -> Result<Self, CapabilityError> {
        if rates.is_empty() {
            return Err(CapabilityError::EmptyRates);
        }
        if formats.is_empty() {
            return Err(CapabilityError::EmptyFormats);
        }
        if channels_min == 0 {
            return Err(CapabilityError::ZeroChannels);
        }
        if channels_min > channels_max {
            return Err(CapabilityError::InvertedChannels {
                min: channels_min,
                max: channels_max,
            });
        }
        Ok(Self {
            rates,
            formats,
            channels_min,
            channels_max,
        })
    }

    pub fn rates(&self) -> &RateSet {
        &self.rates
    }

    pub fn formats(&self) -> &FormatSet {
        &self.formats
    }

    pub fn channels_min(&self) -> u32 {
        self.channels_min
    }

    pub fn channels_max(&self) -> u32 {
        self.channels_max
    }

    /// Lowest advertised rate in Hz.
    pub fn rate_min(&self) -> u32 {
        self.rates.iter().map(SampleRate::hz).min().unwrap_or_default()
    }

    /// Highest advertised rate in Hz.
    pub fn rate_max(&self) -> u32 {
        self.rates.iter().map(SampleRate::hz).max().unwrap_or_default()
    }

    /// Whether a stream with these parameters falls inside the advertisement.
    pub fn accepts(&self, rate_hz: u32, format: SampleFormat, channels: u32) -> bool {
        SampleRate::from_hz(rate_hz).is_some_and(|r| self.rates.contains(r))
            && self.formats.contains(format)
            && (self.channels_min..=self.channels_max).contains(&channels)
    }
}
