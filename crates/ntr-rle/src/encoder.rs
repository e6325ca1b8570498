//! Run-length encoder
//!
//! Greedy single pass: stretches of three or more equal bytes become
//! run chunks, everything else accumulates into literal chunks that
//! flush at the 128-byte cap, when a run starts, or at the end of the
//! input.

use log::debug;
use ntr_core::bytestream::ByteWriter;
use ntr_core::errors::EncodeErrors;

use crate::{MAX_COPY, MAX_ENCODE_LENGTH, MAX_RUN, MIN_RUN, RLE_MAGIC};

/// Encoder for the run-length format.
pub struct RleEncoder<'a>
{
    data: &'a [u8]
}

impl<'a> RleEncoder<'a>
{
    /// Create a new encoder for the given input.
    pub const fn new(data: &'a [u8]) -> RleEncoder<'a>
    {
        RleEncoder { data }
    }
    /// Size of the largest stream `length` input bytes can produce:
    /// the header plus a flag byte per 128 literals.
    pub const fn max_compressed_size(length: usize) -> usize
    {
        8 + length + (length + MAX_COPY - 1) / MAX_COPY
    }

    /// Compress the input, returning the encoded stream.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeErrors>
    {
        if self.data.len() > MAX_ENCODE_LENGTH
        {
            return Err(EncodeErrors::InputTooLarge(
                self.data.len(),
                MAX_ENCODE_LENGTH
            ));
        }

        let mut buffer = vec![0_u8; Self::max_compressed_size(self.data.len())];
        let mut stream = ByteWriter::new(&mut buffer);

        stream.write_u8(RLE_MAGIC);

        if self.data.is_empty()
        {
            stream.write_u24_le(0);
            stream.write_u32_le(0);
        }
        else
        {
            stream.write_u24_le(self.data.len() as u32);
        }

        // start of the pending literal chunk
        let mut literal_start = 0;
        let mut pos = 0;

        while pos < self.data.len()
        {
            let run = self.run_length_at(pos);

            if run >= MIN_RUN
            {
                flush_literals(&mut stream, &self.data[literal_start..pos]);

                let run = run.min(MAX_RUN);
                stream.write_u8(0x80 | (run - 3) as u8);
                stream.write_u8(self.data[pos]);

                pos += run;
                literal_start = pos;
            }
            else
            {
                pos += 1;
            }
        }

        flush_literals(&mut stream, &self.data[literal_start..]);

        let written = stream.position();
        debug!("RLE: compressed {} bytes into {written}", self.data.len());
        buffer.truncate(written);

        Ok(buffer)
    }

    /// Length of the stretch of bytes equal to `data[pos]` starting
    /// at `pos`.
    fn run_length_at(&self, pos: usize) -> usize
    {
        let byte = self.data[pos];

        self.data[pos..]
            .iter()
            .take_while(|b| **b == byte)
            .count()
    }
}

fn flush_literals(stream: &mut ByteWriter, mut literals: &[u8])
{
    while !literals.is_empty()
    {
        let chunk = literals.len().min(MAX_COPY);

        stream.write_u8((chunk - 1) as u8);
        let _ = stream.write_all(&literals[..chunk]);

        literals = &literals[chunk..];
    }
}

#[cfg(test)]
mod tests
{
    use nanorand::{Rng, WyRand};

    use super::RleEncoder;
    use crate::RleDecoder;

    #[test]
    fn runs_become_run_chunks()
    {
        let packed = RleEncoder::new(b"AAAAABC").encode().unwrap();
        assert_eq!(packed, [0x30, 0x07, 0x00, 0x00, 0x82, 0x41, 0x01, 0x42, 0x43]);
    }

    #[test]
    fn incompressible_data_round_trips()
    {
        let data: Vec<u8> = (0..=255).collect();
        let packed = RleEncoder::new(&data).encode().unwrap();
        let out = RleDecoder::new(&packed).decode().unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn long_runs_split_and_round_trip()
    {
        let data = vec![0x41_u8; 1000];
        let packed = RleEncoder::new(&data).encode().unwrap();
        let out = RleDecoder::new(&packed).decode().unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn random_data_round_trips()
    {
        let mut rng = WyRand::new_seed(0x3001);
        let mut data = vec![0_u8; 4097];
        rng.fill(&mut data);
        // sprinkle runs in
        for chunk in data.chunks_mut(97)
        {
            let n = chunk.len().min(5);
            chunk[..n].fill(0x7E);
        }

        let packed = RleEncoder::new(&data).encode().unwrap();
        let out = RleDecoder::new(&packed).decode().unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn empty_input_round_trips()
    {
        let packed = RleEncoder::new(&[]).encode().unwrap();
        let out = RleDecoder::new(&packed).decode().unwrap();
        assert!(out.is_empty());
    }
}
