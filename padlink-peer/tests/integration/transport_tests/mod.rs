mod test_webrtc_loopback;
