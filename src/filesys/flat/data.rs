//! File contents: each file slot owns `SECTORS_PER_FILE` sectors starting
//! at its start block

use super::constants::{MAX_FILE_SIZE, SECTOR_SIZE};
use super::FlatFs;
use crate::debug;
use crate::filesys::block::{sectors_for, Sector};
use crate::filesys::FsError;

impl FlatFs<'_> {
    /// Replaces the contents of a file with `data`, clamped to
    /// `MAX_FILE_SIZE`. Returns the number of bytes stored.
    ///
    /// The tail of the last sector past the data is written as zeroes.
    pub fn write_file(
        &mut self,
        name: &str,
        directory: Option<&str>,
        data: &[u8],
    ) -> Result<usize, FsError> {
        let slot = self.resolve_file(name, directory)?;
        let start = self.files.get(slot).ok_or(FsError::NotFound)?.start_block as u64;

        let len = data.len().min(MAX_FILE_SIZE);
        if len < data.len() {
            debug!("clamping {} byte write to {} to {} bytes", data.len(), name, len);
        }

        self.apply(|fs| {
            for (i, chunk) in data[..len].chunks(SECTOR_SIZE).enumerate() {
                fs.device
                    .write_block(start + i as u64, &Sector::from_partial(chunk))?;
            }
            if let Some(entry) = fs.files.get_mut(slot) {
                entry.size = len as u32;
            }
            Ok(())
        })?;
        debug!(
            "wrote {} bytes ({} sectors) to {} at block {}",
            len,
            sectors_for(len),
            name,
            start
        );
        Ok(len)
    }

    /// Reads up to `out.len()` bytes of a file into `out`. Returns the
    /// number of bytes copied; nothing past that offset is touched.
    pub fn read_file(
        &self,
        name: &str,
        directory: Option<&str>,
        out: &mut [u8],
    ) -> Result<usize, FsError> {
        let slot = self.resolve_file(name, directory)?;
        let entry = self.files.get(slot).ok_or(FsError::NotFound)?;
        let len = entry.len().min(out.len());
        let start = entry.start_block as u64;

        let mut sector = Sector::zeroed();
        for (i, chunk) in out[..len].chunks_mut(SECTOR_SIZE).enumerate() {
            self.device.read_block(start + i as u64, &mut sector)?;
            chunk.copy_from_slice(&sector[..chunk.len()]);
        }
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use crate::filesys::block::{MemoryBlockDevice, SECTOR_SIZE};
    use crate::filesys::flat::constants::{MAX_FILE_SIZE, REQUIRED_BLOCKS};
    use crate::filesys::{FlatFs, FsError};
    use alloc::boxed::Box;
    use alloc::vec;
    use alloc::vec::Vec;

    fn fresh() -> FlatFs<'static> {
        let device = MemoryBlockDevice::new(REQUIRED_BLOCKS, SECTOR_SIZE);
        FlatFs::format(Box::new(device)).unwrap()
    }

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn hello_round_trip() {
        let mut fs = fresh();
        fs.create_file("a.txt", None).unwrap();
        assert_eq!(fs.write_file("a.txt", None, b"hello"), Ok(5));

        let mut out = [0u8; 64];
        assert_eq!(fs.read_file("a.txt", None, &mut out), Ok(5));
        assert_eq!(&out[..5], b"hello");
    }

    #[test]
    fn multi_sector_round_trip() {
        let mut fs = fresh();
        fs.create_file("big.bin", None).unwrap();
        let data = pattern(3 * SECTOR_SIZE + 17);
        assert_eq!(fs.write_file("big.bin", None, &data), Ok(data.len()));

        let mut out = vec![0u8; MAX_FILE_SIZE];
        let n = fs.read_file("big.bin", None, &mut out).unwrap();
        assert_eq!(&out[..n], &data[..]);
    }

    #[test]
    fn oversized_writes_are_clamped() {
        let mut fs = fresh();
        fs.create_file("huge", None).unwrap();
        let data = pattern(MAX_FILE_SIZE + 900);
        assert_eq!(fs.write_file("huge", None, &data), Ok(MAX_FILE_SIZE));
        assert_eq!(fs.metadata("huge", None).unwrap().size, MAX_FILE_SIZE);

        let mut out = vec![0u8; 2 * MAX_FILE_SIZE];
        assert_eq!(fs.read_file("huge", None, &mut out), Ok(MAX_FILE_SIZE));
        assert_eq!(&out[..MAX_FILE_SIZE], &data[..MAX_FILE_SIZE]);
    }

    #[test]
    fn clamped_write_stays_inside_its_slot() {
        let mut fs = fresh();
        fs.create_file("first", None).unwrap();
        fs.create_file("second", None).unwrap();
        fs.write_file("second", None, b"neighbour").unwrap();
        fs.write_file("first", None, &vec![0xAB; MAX_FILE_SIZE * 2])
            .unwrap();

        let mut out = [0u8; 16];
        let n = fs.read_file("second", None, &mut out).unwrap();
        assert_eq!(&out[..n], b"neighbour");
    }

    #[test]
    fn short_reads_never_overrun_the_buffer() {
        let mut fs = fresh();
        fs.create_file("log", None).unwrap();
        fs.write_file("log", None, &pattern(1000)).unwrap();

        let mut buf = [0xEEu8; 1024];
        assert_eq!(fs.read_file("log", None, &mut buf[..700]), Ok(700));
        assert_eq!(&buf[..700], &pattern(1000)[..700]);
        assert!(buf[700..].iter().all(|&b| b == 0xEE));
    }

    #[test]
    fn last_sector_tail_is_zeroed() {
        let mut fs = fresh();
        fs.create_file("a.txt", None).unwrap();
        fs.write_file("a.txt", None, &[0xFF; SECTOR_SIZE]).unwrap();
        fs.write_file("a.txt", None, b"hello").unwrap();

        let mut sector = [0u8; SECTOR_SIZE];
        fs.device().read_block(10, &mut sector).unwrap();
        assert_eq!(&sector[..5], b"hello");
        assert!(sector[5..].iter().all(|&b| b == 0));
        assert_eq!(fs.metadata("a.txt", None).unwrap().size, 5);
    }

    #[test]
    fn same_name_in_two_directories_keeps_separate_data() {
        let mut fs = fresh();
        fs.create_directory("docs").unwrap();
        fs.create_file("notes", None).unwrap();
        fs.create_file("notes", Some("docs")).unwrap();
        fs.write_file("notes", None, b"root copy").unwrap();
        fs.write_file("notes", Some("docs"), b"docs copy").unwrap();

        let mut out = [0u8; 32];
        let n = fs.read_file("notes", Some("docs"), &mut out).unwrap();
        assert_eq!(&out[..n], b"docs copy");
        let n = fs.read_file("notes", None, &mut out).unwrap();
        assert_eq!(&out[..n], b"root copy");
    }

    #[test]
    fn missing_files_are_not_found() {
        let mut fs = fresh();
        let mut out = [0u8; 8];
        assert_eq!(fs.write_file("ghost", None, b"boo"), Err(FsError::NotFound));
        assert_eq!(fs.read_file("ghost", None, &mut out), Err(FsError::NotFound));
    }

    #[test]
    fn empty_files_read_nothing() {
        let mut fs = fresh();
        fs.create_file("empty", None).unwrap();
        let mut out = [0x11u8; 8];
        assert_eq!(fs.read_file("empty", None, &mut out), Ok(0));
        assert_eq!(out, [0x11; 8]);
        assert_eq!(fs.write_file("empty", None, b""), Ok(0));
    }

    #[test]
    fn contents_survive_a_remount() {
        let mut fs = fresh();
        fs.create_file("README.txt", None).unwrap();
        fs.write_file("README.txt", None, b"Welcome to PulseOS!\n")
            .unwrap();

        let fs = FlatFs::new(fs.into_device()).unwrap();
        let mut out = [0u8; 64];
        let n = fs.read_file("README.txt", None, &mut out).unwrap();
        assert_eq!(&out[..n], b"Welcome to PulseOS!\n");
    }
}
