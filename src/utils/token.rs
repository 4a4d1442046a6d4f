use rand::RngCore;

/// 生成一次性重置令牌（48 字节随机数的十六进制表示）
pub fn generate_reset_token() -> String {
    let mut buffer = [0u8; 48];
    rand::thread_rng().fill_bytes(&mut buffer);
    buffer.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_reset_token() {
        let token = generate_reset_token();
        assert_eq!(token.len(), 96);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_differ() {
        assert_ne!(generate_reset_token(), generate_reset_token());
    }
}
