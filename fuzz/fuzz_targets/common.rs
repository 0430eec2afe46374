use frenc::Framing;

#[derive(arbitrary::Arbitrary)]
pub struct FuzzInput {
    pub strings: Vec<Vec<u8>>,
    pub framing: FuzzFraming,
}

impl FuzzInput {
    /// The strings with every `0` byte replaced, so they are encodable.
    pub fn encodable(&self) -> Vec<Vec<u8>> {
        self.strings
            .iter()
            .map(|s| s.iter().map(|&b| if b == 0 { 1 } else { b }).collect())
            .collect()
    }
}

impl std::fmt::Debug for FuzzInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for s in &self.strings {
            list.entry(&HexSlice(s));
        }
        list.finish()?;
        write!(f, " {:?}", self.framing)
    }
}

#[derive(arbitrary::Arbitrary, Clone, Copy, PartialEq, Eq, Debug)]
pub enum FuzzFraming {
    Bare,
    SizeHinted,
}

impl From<FuzzFraming> for Framing {
    fn from(framing: FuzzFraming) -> Self {
        match framing {
            FuzzFraming::Bare => Framing::Bare,
            FuzzFraming::SizeHinted => Framing::SizeHinted,
        }
    }
}

pub struct HexSlice<'a>(pub &'a [u8]);

impl std::fmt::Debug for HexSlice<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const MAX: usize = 32;

        let total = self.0.len();
        let shown = total.min(MAX);
        for v in &self.0[..shown] {
            write!(f, "{v:02x}")?;
        }
        if total > MAX {
            write!(f, "..({total} bytes)")?;
        }
        Ok(())
    }
}
