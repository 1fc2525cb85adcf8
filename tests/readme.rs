// Please keep the code below in sync with `README.md`.

mod decoding_1 {
    use bdecode::{Error, Value};

    #[test]
    fn decode_document() -> Result<(), Error> {
        let dict = bdecode::decode(b"d4:testli4ei3ee3:foo3:bare")?;

        assert_eq!(dict[&b"foo"[..]].as_str(), Some("bar"));
        assert_eq!(
            dict[&b"test"[..]],
            Value::List(vec![Value::from(4i64), Value::from(3i64)])
        );
        Ok(())
    }
}

mod decoding_2 {
    use std::{fs::File, io::Write};

    fn announce_url(path: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
        let dict = bdecode::decode_reader(File::open(path)?)?;
        Ok(dict
            .get(&b"announce"[..])
            .and_then(bdecode::Value::as_str)
            .map(str::to_owned))
    }

    #[test]
    fn decode_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let path = std::env::temp_dir()
            .join(format!("bdecode-readme-{}.torrent", std::process::id()));
        File::create(&path)?.write_all(b"d8:announce13:udp://tracker4:infodee")?;

        let url = announce_url(path.to_str().expect("temp paths are UTF-8"));
        std::fs::remove_file(&path)?;

        assert_eq!(url?.as_deref(), Some("udp://tracker"));
        Ok(())
    }
}

mod limits {
    use bdecode::decoding::Decoder;

    #[test]
    fn limits_reject_hostile_input() {
        let result = Decoder::new(b"d1:alllleeeee")
            .with_max_depth(3)
            .with_max_string_length(1 << 20)
            .decode();
        assert!(result.is_err());
    }
}
