pub(super) const ENTRIES: &[(&str, &str)] = &[
    ("common.appName", "AV Stream Space"),
    ("common.login", "Login"),
    ("common.logout", "Logout"),
    ("common.dashboard", "Dashboard"),
    ("common.media", "Media Management"),
    ("common.live", "Live Streaming"),
    ("common.ai", "AI Services"),
    ("common.monitor", "System Monitor"),
    ("common.settings", "Settings"),
    ("common.save", "Save"),
    ("common.cancel", "Cancel"),
    ("common.confirm", "Confirm"),
    ("common.delete", "Delete"),
    ("common.edit", "Edit"),
    ("common.add", "Add"),
    ("common.search", "Search"),
    ("common.reset", "Reset"),
    ("common.operation", "Operation"),
    ("common.status", "Status"),
    ("common.createTime", "Create Time"),
    ("common.updateTime", "Update Time"),
    ("common.loading", "Loading..."),
    ("common.notFound", "Page Not Found"),
    ("login.title", "Intelligent AV Streaming Platform"),
    ("login.username", "Username"),
    ("login.password", "Password"),
    ("login.rememberMe", "Remember Me"),
    ("login.loginBtn", "Login"),
    ("login.usernameRequired", "Please enter username"),
    ("login.passwordRequired", "Please enter password"),
    ("dashboard.title", "Dashboard"),
    ("dashboard.stats.totalStreams", "Total Streams"),
    ("dashboard.stats.activeStreams", "Active Streams"),
    ("dashboard.stats.totalUsers", "Total Users"),
    ("dashboard.stats.onlineUsers", "Online Users"),
    ("dashboard.stats.storageUsage", "Storage Usage"),
    ("dashboard.stats.cpuUsage", "CPU Usage"),
    ("dashboard.stats.memoryUsage", "Memory Usage"),
    ("dashboard.charts.streamTrend", "Stream Trend"),
    ("dashboard.charts.userActivity", "User Activity"),
    ("dashboard.charts.systemLoad", "System Load"),
    ("media.title", "Media Management"),
    ("media.upload", "Upload Media"),
    ("media.videoList", "Video List"),
    ("media.audioList", "Audio List"),
    ("media.imageList", "Image List"),
    ("media.fileName", "File Name"),
    ("media.fileSize", "File Size"),
    ("media.duration", "Duration"),
    ("media.format", "Format"),
    ("media.uploadTime", "Upload Time"),
    ("live.title", "Live Streaming"),
    ("live.createStream", "Create Stream"),
    ("live.streamList", "Stream List"),
    ("live.streamKey", "Stream Key"),
    ("live.streamUrl", "Stream URL"),
    ("live.status", "Status"),
    ("live.viewers", "Viewers"),
    ("live.startTime", "Start Time"),
    ("live.endTime", "End Time"),
    ("live.actions", "Actions"),
    ("live.startLive", "Start Live"),
    ("live.stopLive", "Stop Live"),
    ("ai.title", "AI Services"),
    ("ai.voice", "Voice Processing"),
    ("ai.image", "Image Generation"),
    ("ai.imageProcessing", "Image Processing"),
    ("ai.analysis", "Smart Analysis"),
    ("ai.speechToText", "Speech to Text"),
    ("ai.textToSpeech", "Text to Speech"),
    ("ai.imageGeneration", "Image Generation"),
    ("ai.videoAnalysis", "Video Analysis"),
    ("ai.uploadFile", "Upload File"),
    ("ai.process", "Process"),
    ("ai.result", "Result"),
    ("monitor.title", "System Monitor"),
    ("monitor.system", "System Monitor"),
    ("monitor.services", "Service Status"),
    ("monitor.logs", "Log Monitor"),
    ("monitor.performance", "Performance Metrics"),
    ("monitor.uptime", "Uptime"),
    ("monitor.responseTime", "Response Time"),
    ("monitor.errorRate", "Error Rate"),
    ("settings.title", "Settings"),
    ("settings.general", "General"),
    ("settings.security", "Security"),
    ("settings.storage", "Storage"),
    ("settings.ai", "AI Settings"),
    ("settings.stream", "Stream Settings"),
    ("settings.saveSuccess", "Save Success"),
];
